use anyhow::{bail, Result};
use aoss_shared::TrackedPair;
use aoss_vision::{
    select_biggest, Blob, BlobTracker, BorderKind, ColorFrame, GrayImage, Moments, PixelLayout,
    Rect, TrackerConfig,
};
use opencv::{
    core::{self, Mat, Size, Vector, CV_8UC3},
    imgproc,
    prelude::*,
};

/// Result of analyzing one video frame
pub struct FrameAnalysis {
    /// Foreground mask shown in the skin filter window
    pub foreground: Mat,
    pub blobs: Vec<Blob>,
    pub pair: Option<(usize, usize)>,
}

impl FrameAnalysis {
    pub fn selected(&self) -> Option<(&Blob, &Blob)> {
        self.pair.map(|(a, b)| (&self.blobs[a], &self.blobs[b]))
    }

    pub fn tracked_pair(&self) -> Option<TrackedPair> {
        self.selected()
            .map(|(a, b)| TrackedPair::new(a.centroid, b.centroid))
    }
}

/// Per-frame tracking backend
pub trait FrameAnalyzer {
    fn name(&self) -> &'static str;

    /// Analyze a BGR frame
    fn analyze(&mut self, frame: &Mat) -> Result<FrameAnalysis>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    /// OpenCV primitives
    Opencv,
    /// Pure Rust pipeline from aoss-vision
    Native,
}

pub fn build_analyzer(backend: Backend, config: TrackerConfig) -> Result<Box<dyn FrameAnalyzer>> {
    Ok(match backend {
        Backend::Opencv => Box::new(OpenCvAnalyzer::new(config)?),
        Backend::Native => Box::new(NativeAnalyzer::new(config)),
    })
}

fn ensure_bgr(frame: &Mat) -> Result<()> {
    if frame.empty() {
        bail!("empty frame");
    }
    if frame.typ() != CV_8UC3 {
        bail!("expected an 8-bit BGR frame, got type {}", frame.typ());
    }
    Ok(())
}

fn rect_kernel(half_size: u8) -> Result<Mat> {
    let r = half_size as i32;
    Ok(imgproc::get_structuring_element(
        imgproc::MORPH_RECT,
        Size::new(2 * r + 1, 2 * r + 1),
        core::Point::new(r, r),
    )?)
}

/// Pipeline built from OpenCV calls
pub struct OpenCvAnalyzer {
    config: TrackerConfig,
    erode_kernel: Mat,
    dilate_kernel: Mat,
}

impl OpenCvAnalyzer {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        Ok(Self {
            erode_kernel: rect_kernel(config.erosion_size)?,
            dilate_kernel: rect_kernel(config.dilation_size)?,
            config,
        })
    }

    /// 0 inside the skin HSV box, 255 elsewhere
    fn skin_mask(&self, frame: &Mat) -> Result<Mat> {
        let mut hsv = Mat::default();
        imgproc::cvt_color(frame, &mut hsv, imgproc::COLOR_BGR2HSV, 0)?;

        let mut planes = Vector::<Mat>::new();
        core::split(&hsv, &mut planes)?;

        let skin = &self.config.skin;
        let limits = [skin.hue_max, skin.saturation_max, skin.value_max];
        let mut gated = Vec::with_capacity(3);
        for (i, limit) in limits.iter().enumerate() {
            let mut plane = Mat::default();
            imgproc::threshold(
                &planes.get(i)?,
                &mut plane,
                *limit as f64,
                255.0,
                imgproc::THRESH_BINARY_INV,
            )?;
            gated.push(plane);
        }

        let mut hs = Mat::default();
        core::bitwise_and(&gated[0], &gated[1], &mut hs, &core::no_array())?;
        let mut hsv_gate = Mat::default();
        core::bitwise_and(&hs, &gated[2], &mut hsv_gate, &core::no_array())?;

        let mut mask = Mat::default();
        core::bitwise_not(&hsv_gate, &mut mask, &core::no_array())?;
        Ok(mask)
    }

    fn foreground(&self, frame: &Mat) -> Result<Mat> {
        let mut gray = Mat::default();
        imgproc::cvt_color(frame, &mut gray, imgproc::COLOR_BGR2GRAY, 0)?;

        let k = self.config.blur_size.max(1) as i32;
        let mut blurred = Mat::default();
        imgproc::blur(
            &gray,
            &mut blurred,
            Size::new(k, k),
            core::Point::new(-1, -1),
            core::BORDER_DEFAULT,
        )?;

        let mut dark = Mat::default();
        imgproc::threshold(
            &blurred,
            &mut dark,
            self.config.gray_threshold as f64,
            255.0,
            imgproc::THRESH_BINARY_INV,
        )?;

        let skin = self.skin_mask(frame)?;
        let mut foreground = Mat::default();
        core::subtract(&dark, &skin, &mut foreground, &core::no_array(), -1)?;
        Ok(foreground)
    }

    fn clean(&self, foreground: &Mat) -> Result<Mat> {
        let border_value = imgproc::morphology_default_border_value()?;

        let mut eroded = Mat::default();
        imgproc::erode(
            foreground,
            &mut eroded,
            &self.erode_kernel,
            core::Point::new(-1, -1),
            1,
            core::BORDER_CONSTANT,
            border_value,
        )?;

        let mut dilated = Mat::default();
        imgproc::dilate(
            &eroded,
            &mut dilated,
            &self.dilate_kernel,
            core::Point::new(-1, -1),
            1,
            core::BORDER_CONSTANT,
            border_value,
        )?;
        Ok(dilated)
    }

    fn blob_from(&self, contour: &Vector<core::Point>, kind: BorderKind) -> Result<Option<Blob>> {
        let area = imgproc::contour_area(contour, false)?;
        if area <= self.config.min_area {
            return Ok(None);
        }

        let mut poly = Vector::<core::Point>::new();
        imgproc::approx_poly_dp(contour, &mut poly, self.config.approx_epsilon, true)?;

        let rect = imgproc::bounding_rect(&poly)?;
        let m = imgproc::moments(&poly, false)?;
        let moments = Moments {
            m00: m.m00,
            m10: m.m10,
            m01: m.m01,
            m20: m.m20,
            m11: m.m11,
            m02: m.m02,
        };
        let Some(centroid) = moments.centroid() else {
            return Ok(None);
        };

        Ok(Some(Blob {
            kind,
            area,
            polygon: poly
                .iter()
                .map(|p| aoss_vision::Point::new(p.x, p.y))
                .collect(),
            bounds: Rect {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
            },
            moments,
            centroid,
        }))
    }
}

/// Even nesting depth is an outer border, odd depth a hole
fn border_kind(hierarchy: &Vector<core::Vec4i>, index: usize) -> Result<BorderKind> {
    let mut depth = 0;
    let mut parent = hierarchy.get(index)?[3];
    while parent >= 0 {
        depth += 1;
        parent = hierarchy.get(parent as usize)?[3];
    }
    Ok(if depth % 2 == 0 {
        BorderKind::Outer
    } else {
        BorderKind::Hole
    })
}

impl FrameAnalyzer for OpenCvAnalyzer {
    fn name(&self) -> &'static str {
        "opencv"
    }

    fn analyze(&mut self, frame: &Mat) -> Result<FrameAnalysis> {
        ensure_bgr(frame)?;

        let foreground = self.foreground(frame)?;
        let mask = self.clean(&foreground)?;

        let mut contours = Vector::<Vector<core::Point>>::new();
        let mut hierarchy = Vector::<core::Vec4i>::new();
        imgproc::find_contours_with_hierarchy(
            &mask,
            &mut contours,
            &mut hierarchy,
            imgproc::RETR_TREE,
            imgproc::CHAIN_APPROX_SIMPLE,
            core::Point::new(0, 0),
        )?;

        let mut blobs = Vec::new();
        for (i, contour) in contours.iter().enumerate() {
            let kind = border_kind(&hierarchy, i)?;
            if let Some(blob) = self.blob_from(&contour, kind)? {
                blobs.push(blob);
            }
        }

        let areas: Vec<f64> = blobs.iter().map(|b| b.moments.m00).collect();
        let pair = select_biggest(&areas);
        log::debug!(
            "{} contours, {} blobs, pair {:?}",
            contours.len(),
            blobs.len(),
            pair
        );

        Ok(FrameAnalysis {
            foreground,
            blobs,
            pair,
        })
    }
}

/// Pipeline from aoss-vision fed with the frame's raw bytes
pub struct NativeAnalyzer {
    tracker: BlobTracker,
}

impl NativeAnalyzer {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracker: BlobTracker::new(config),
        }
    }
}

impl FrameAnalyzer for NativeAnalyzer {
    fn name(&self) -> &'static str {
        "native"
    }

    fn analyze(&mut self, frame: &Mat) -> Result<FrameAnalysis> {
        ensure_bgr(frame)?;

        let continuous;
        let frame = if frame.is_continuous() {
            frame
        } else {
            continuous = frame.try_clone()?;
            &continuous
        };

        let color = ColorFrame::new(
            frame.cols() as usize,
            frame.rows() as usize,
            PixelLayout::Bgr,
            frame.data_bytes()?,
        )?;
        let analysis = self.tracker.analyze_color(&color)?;

        Ok(FrameAnalysis {
            foreground: gray_to_mat(&analysis.foreground)?,
            blobs: analysis.blobs,
            pair: analysis.pair,
        })
    }
}

/// Copy a gray image into an owned single channel `Mat`
pub fn gray_to_mat(img: &GrayImage) -> Result<Mat> {
    let view = Mat::new_rows_cols_with_data(
        img.height() as i32,
        img.width() as i32,
        img.as_raw().as_slice(),
    )?;
    Ok(view.try_clone()?)
}

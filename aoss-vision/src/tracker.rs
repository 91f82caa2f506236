use aoss_shared::{Position, TrackedPair};
use image::{GrayImage, Luma};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::geometry::{approximate_polygon_dp, contour_area};
use imageproc::map::map_colors2;
use imageproc::{filter, morphology};
use serde::{Deserialize, Serialize};

use crate::color::ColorFrame;
use crate::contour::{self, BorderKind, Point, Rect};
use crate::error::{Result, VisionError};
use crate::gray;
use crate::moments::Moments;
use crate::select::select_biggest;
use crate::skin::{skin_mask, SkinRange};

/// Tuning of the per-frame pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Gray level at or below which a pixel counts as dark
    pub gray_threshold: u8,
    /// Box blur kernel side
    pub blur_size: u32,
    /// Erosion square half-size
    pub erosion_size: u8,
    /// Dilation square half-size
    pub dilation_size: u8,
    /// Contours whose area does not exceed this are ignored
    pub min_area: f64,
    /// Douglas–Peucker tolerance in pixels
    pub approx_epsilon: f64,
    pub skin: SkinRange,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            gray_threshold: 45,
            blur_size: 3,
            erosion_size: 3,
            dilation_size: 3,
            min_area: 500.0,
            approx_epsilon: 3.0,
            skin: SkinRange::default(),
        }
    }
}

impl TrackerConfig {
    pub fn with_gray_threshold(mut self, threshold: u8) -> Self {
        self.gray_threshold = threshold;
        self
    }

    pub fn with_min_area(mut self, area: f64) -> Self {
        self.min_area = area;
        self
    }

    pub fn with_morphology(mut self, erosion_size: u8, dilation_size: u8) -> Self {
        self.erosion_size = erosion_size;
        self.dilation_size = dilation_size;
        self
    }

    pub fn with_skin_range(mut self, skin: SkinRange) -> Self {
        self.skin = skin;
        self
    }
}

/// A foreground region that passed the area filter
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub kind: BorderKind,
    /// Area of the raw border
    pub area: f64,
    /// Simplified border
    pub polygon: Vec<Point>,
    pub bounds: Rect,
    /// Moments of `polygon`
    pub moments: Moments,
    pub centroid: Position,
}

/// Everything one frame produced
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Dark pixels inside the skin gate, before morphology
    pub foreground: GrayImage,
    /// Foreground after erosion and dilation
    pub mask: GrayImage,
    pub blobs: Vec<Blob>,
    /// Indexes into `blobs` of the largest and second-largest blob
    pub pair: Option<(usize, usize)>,
}

impl Analysis {
    pub fn selected(&self) -> Option<(&Blob, &Blob)> {
        self.pair.map(|(a, b)| (&self.blobs[a], &self.blobs[b]))
    }

    pub fn tracked_pair(&self) -> Option<TrackedPair> {
        self.selected()
            .map(|(a, b)| TrackedPair::new(a.centroid, b.centroid))
    }

    pub fn distance(&self) -> Option<f64> {
        self.tracked_pair().map(|pair| pair.distance())
    }
}

/// Two-blob tracker running entirely on raw pixel buffers
#[derive(Debug, Clone, Default)]
pub struct BlobTracker {
    config: TrackerConfig,
}

impl BlobTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Analyze a color frame, deriving the gray image from it
    pub fn analyze_color(&self, frame: &ColorFrame<'_>) -> Result<Analysis> {
        let gray = gray::from_color(frame);
        self.analyze(&gray, frame)
    }

    /// Analyze a frame whose gray image comes from elsewhere (e.g. a camera luma plane)
    pub fn analyze(&self, gray: &GrayImage, color: &ColorFrame<'_>) -> Result<Analysis> {
        let (width, height) = gray.dimensions();
        if (width as usize, height as usize) != (color.width(), color.height()) {
            return Err(VisionError::SizeMismatch {
                left: (width as usize, height as usize),
                right: (color.width(), color.height()),
            });
        }
        let cfg = &self.config;

        let radius = cfg.blur_size / 2;
        let blurred = filter::box_filter(gray, radius, radius);
        let dark = threshold(&blurred, cfg.gray_threshold, ThresholdType::BinaryInverted);
        let skin = skin_mask(color, &cfg.skin);
        let foreground: GrayImage = map_colors2(&dark, &skin, |d: Luma<u8>, s: Luma<u8>| {
            Luma([d[0].saturating_sub(s[0])])
        });

        let eroded = morphology::erode(&foreground, Norm::LInf, cfg.erosion_size);
        let mask = morphology::dilate(&eroded, Norm::LInf, cfg.dilation_size);

        let contours = contour::find_contours(&mask);
        let total = contours.len();
        let blobs: Vec<Blob> = contours
            .into_iter()
            .filter_map(|c| self.blob_from(c.kind, c.points))
            .collect();

        let areas: Vec<f64> = blobs.iter().map(|b| b.moments.m00).collect();
        let pair = select_biggest(&areas);

        log::debug!(
            "{} contours, {} above {} px, pair {:?}",
            total,
            blobs.len(),
            cfg.min_area,
            pair
        );

        Ok(Analysis {
            foreground,
            mask,
            blobs,
            pair,
        })
    }

    fn blob_from(&self, kind: BorderKind, points: Vec<Point>) -> Option<Blob> {
        let area = contour_area(&points).abs();
        if area <= self.config.min_area {
            return None;
        }
        let polygon = if self.config.approx_epsilon > 0.0 {
            approximate_polygon_dp(&points, self.config.approx_epsilon, true)
        } else {
            points
        };
        let bounds = contour::bounding_rect(&polygon);
        let moments = Moments::of_polygon(&polygon);
        let centroid = moments.centroid()?;
        Some(Blob {
            kind,
            area,
            polygon,
            bounds,
            moments,
            centroid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PixelLayout;

    #[test]
    fn test_config_defaults() {
        let cfg = TrackerConfig::default();
        assert_eq!(cfg.gray_threshold, 45);
        assert_eq!(cfg.erosion_size, 3);
        assert_eq!(cfg.dilation_size, 3);
        assert_eq!(cfg.min_area, 500.0);
        assert_eq!(cfg.skin, SkinRange::default());
    }

    #[test]
    fn test_config_from_partial_json() {
        let cfg: TrackerConfig =
            serde_json::from_str(r#"{"min_area": 1.0, "skin": {"value_max": 90}}"#).unwrap();
        assert_eq!(cfg.min_area, 1.0);
        assert_eq!(cfg.gray_threshold, 45);
        assert_eq!(cfg.skin.value_max, 90);
        assert_eq!(cfg.skin.hue_max, 18);
    }

    #[test]
    fn test_builder() {
        let cfg = TrackerConfig::default()
            .with_gray_threshold(60)
            .with_min_area(1.0)
            .with_morphology(1, 2);
        assert_eq!(cfg.gray_threshold, 60);
        assert_eq!(cfg.min_area, 1.0);
        assert_eq!((cfg.erosion_size, cfg.dilation_size), (1, 2));
    }

    #[test]
    fn test_white_frame_has_no_blobs() {
        let data = vec![255u8; 40 * 30 * 3];
        let frame = ColorFrame::new(40, 30, PixelLayout::Bgr, &data).unwrap();
        let analysis = BlobTracker::default().analyze_color(&frame).unwrap();
        assert!(analysis.blobs.is_empty());
        assert_eq!(analysis.pair, None);
        assert_eq!(analysis.tracked_pair(), None);
        assert!(analysis.foreground.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_gray_size_must_match_frame() {
        let data = vec![0u8; 4 * 4 * 3];
        let frame = ColorFrame::new(4, 4, PixelLayout::Bgr, &data).unwrap();
        let gray = GrayImage::new(3, 4);
        assert!(matches!(
            BlobTracker::default().analyze(&gray, &frame),
            Err(VisionError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_collapsed_polygon_is_dropped() {
        let tracker = BlobTracker::new(TrackerConfig::default().with_min_area(1.0));
        // A sliver whose area passes the filter but whose outline
        // simplifies to a two point segment
        let sliver = vec![
            Point::new(0, 0),
            Point::new(50, 1),
            Point::new(100, 0),
            Point::new(50, -1),
        ];
        assert_eq!(contour_area(&sliver).abs(), 100.0);
        assert!(tracker.blob_from(BorderKind::Outer, sliver).is_none());
    }

    #[test]
    fn test_square_becomes_blob() {
        let tracker = BlobTracker::new(TrackerConfig::default().with_min_area(1.0));
        let border: Vec<Point> = (0..10)
            .map(|x| Point::new(x, 0))
            .chain((1..10).map(|y| Point::new(9, y)))
            .chain((0..9).rev().map(|x| Point::new(x, 9)))
            .chain((1..9).rev().map(|y| Point::new(0, y)))
            .collect();
        let blob = tracker.blob_from(BorderKind::Outer, border).unwrap();
        assert_eq!(blob.area, 81.0);
        assert!((blob.moments.m00 - 81.0).abs() < 1e-9);
        assert_eq!(blob.centroid, Position::new(4.5, 4.5));
        assert_eq!(
            blob.bounds,
            Rect {
                x: 0,
                y: 0,
                width: 10,
                height: 10
            }
        );
    }
}

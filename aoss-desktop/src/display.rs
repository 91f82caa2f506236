use anyhow::Result;
use opencv::{
    core::{Mat, Point, Scalar, Vector, CV_8UC3},
    highgui, imgproc,
    prelude::*,
};

use crate::analyzer::FrameAnalysis;
use crate::chart::draw_bar_chart;

pub const WIN_UNDER_TEST: &str = "Under Test";
pub const WIN_SKIN: &str = "Skin Filter";
pub const WIN_SELECTED: &str = "Selected Contours";
pub const WIN_TRACKING: &str = "Tracking";
pub const WIN_CHART: &str = "Bar Chart";

fn green() -> Scalar {
    Scalar::new(0.0, 255.0, 0.0, 0.0)
}

fn to_cv(p: aoss_vision::Point) -> Point {
    Point::new(p.x, p.y)
}

fn centroid_point(blob: &aoss_vision::Blob) -> Point {
    let (x, y) = blob.centroid.to_pixel();
    Point::new(x, y)
}

/// Polygons, bounding boxes and centroids of the selected pair on black
pub fn draw_selected(rows: i32, cols: i32, analysis: &FrameAnalysis) -> Result<Mat> {
    let mut objects = Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::all(0.0))?;
    let Some((first, second)) = analysis.selected() else {
        return Ok(objects);
    };

    for blob in [first, second] {
        let polygon: Vector<Point> = blob.polygon.iter().copied().map(to_cv).collect();
        imgproc::polylines(&mut objects, &polygon, true, green(), 2, imgproc::LINE_8, 0)?;

        let b = blob.bounds;
        imgproc::rectangle(
            &mut objects,
            opencv::core::Rect::new(b.x, b.y, b.width, b.height),
            green(),
            2,
            imgproc::LINE_8,
            0,
        )?;
        imgproc::circle(
            &mut objects,
            centroid_point(blob),
            5,
            green(),
            -1,
            imgproc::LINE_8,
            0,
        )?;
    }
    Ok(objects)
}

/// Dot both centroids onto `canvas`
pub fn mark_centroids(canvas: &mut Mat, analysis: &FrameAnalysis) -> Result<()> {
    if let Some((first, second)) = analysis.selected() {
        for blob in [first, second] {
            imgproc::circle(
                canvas,
                centroid_point(blob),
                5,
                green(),
                -1,
                imgproc::LINE_8,
                0,
            )?;
        }
    }
    Ok(())
}

/// The five desktop windows. The tracking canvas keeps every centroid
/// drawn since the first frame.
pub struct Visualizer {
    frame_width: i32,
    frame_height: i32,
    tracking: Option<Mat>,
}

impl Visualizer {
    pub fn open(frame_width: i32, frame_height: i32) -> Result<Self> {
        highgui::named_window(WIN_UNDER_TEST, highgui::WINDOW_NORMAL)?;
        highgui::move_window(WIN_UNDER_TEST, 720, 0)?;

        highgui::named_window(WIN_SKIN, highgui::WINDOW_NORMAL)?;
        highgui::move_window(WIN_SKIN, frame_width, 0)?;

        highgui::named_window(WIN_SELECTED, highgui::WINDOW_NORMAL)?;
        highgui::move_window(WIN_SELECTED, 720, 300)?;

        highgui::named_window(WIN_TRACKING, highgui::WINDOW_NORMAL)?;
        highgui::move_window(WIN_TRACKING, frame_width, 300)?;

        highgui::named_window(WIN_CHART, highgui::WINDOW_NORMAL)?;
        highgui::move_window(WIN_CHART, 490, 0)?;
        highgui::resize_window(WIN_CHART, 220, 450)?;

        Ok(Self {
            frame_width,
            frame_height,
            tracking: None,
        })
    }

    pub fn show(&mut self, frame: &Mat, analysis: &FrameAnalysis) -> Result<()> {
        highgui::imshow(WIN_UNDER_TEST, frame)?;
        highgui::imshow(WIN_SKIN, &analysis.foreground)?;

        let objects = draw_selected(frame.rows(), frame.cols(), analysis)?;
        highgui::imshow(WIN_SELECTED, &objects)?;

        if self.tracking.is_none() {
            self.tracking = Some(Mat::new_rows_cols_with_default(
                frame.rows(),
                frame.cols(),
                CV_8UC3,
                Scalar::all(0.0),
            )?);
        }
        if let Some(tracking) = self.tracking.as_mut() {
            mark_centroids(tracking, analysis)?;
            highgui::imshow(WIN_TRACKING, tracking)?;
        }

        let pair = analysis.tracked_pair();
        let chart = draw_bar_chart(self.frame_width, self.frame_height, pair.as_ref())?;
        highgui::imshow(WIN_CHART, &chart)?;
        Ok(())
    }
}

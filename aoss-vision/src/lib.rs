//! Two-blob tracking pipeline for AOSS
//! Segments dark foreground inside a skin-tone HSV gate, keeps the two largest
//! blobs and reports their centroids
//! Works on raw pixel buffers so it runs anywhere, with or without OpenCV

pub mod color;
pub mod contour;
pub mod error;
pub mod gray;
pub mod moments;
pub mod select;
pub mod skin;
pub mod tracker;

pub use color::{Bgr, ColorFrame, Hsv, PixelLayout};
pub use contour::{BorderKind, Contour, Point, Rect};
pub use error::{Result, VisionError};
pub use image::GrayImage;
pub use moments::Moments;
pub use select::select_biggest;
pub use skin::SkinRange;
pub use tracker::{Analysis, Blob, BlobTracker, TrackerConfig};

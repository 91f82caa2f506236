#![cfg_attr(not(feature = "std"), no_std)]

use serde::{Deserialize, Serialize};

#[cfg(feature = "std")]
pub mod fps;

#[cfg(feature = "std")]
pub use fps::FpsMeter;

/// Represents a 2D position in image coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another position
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrtf(dx * dx + dy * dy)
    }

    /// Truncate toward zero to whole pixel coordinates
    pub fn to_pixel(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

/// Centroids of the two largest blobs found in a frame.
///
/// `first` belongs to the largest blob, `second` to the runner-up. All
/// derived measurements work on whole pixel centers, which is what the
/// tracker reports to its consumers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TrackedPair {
    pub first: Position,
    pub second: Position,
}

impl TrackedPair {
    pub fn new(first: Position, second: Position) -> Self {
        Self { first, second }
    }

    pub fn pixel_centers(&self) -> ((i32, i32), (i32, i32)) {
        (self.first.to_pixel(), self.second.to_pixel())
    }

    /// Euclidean distance between the two pixel centers
    pub fn distance(&self) -> f64 {
        let ((x1, y1), (x2, y2)) = self.pixel_centers();
        let dx = (x1 - x2) as f64;
        let dy = (y1 - y2) as f64;
        libm::sqrt(dx * dx + dy * dy)
    }

    /// Per-axis distance `(dx, dy)` between the two pixel centers
    pub fn axis_distance(&self) -> (u32, u32) {
        let ((x1, y1), (x2, y2)) = self.pixel_centers();
        ((x1 - x2).unsigned_abs(), (y1 - y2).unsigned_abs())
    }

    /// The two pixel centers ordered left to right
    pub fn left_right(&self) -> ((i32, i32), (i32, i32)) {
        let (a, b) = self.pixel_centers();
        if a.0 < b.0 {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// Per-frame outcome emitted by the front ends
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub pair: Option<TrackedPair>,
    pub distance: Option<f64>,
    pub blob_count: usize,
}

impl FrameReport {
    pub fn new(frame: u64, pair: Option<TrackedPair>, blob_count: usize) -> Self {
        Self {
            frame,
            pair,
            distance: pair.map(|p| p.distance()),
            blob_count,
        }
    }

    /// Serialize as a single JSON line (no trailing newline)
    #[cfg(feature = "std")]
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

use anyhow::{Context, Result};
use aoss_vision::TrackerConfig;
use std::path::Path;

/// Tracker settings from an optional JSON file, then command line overrides
pub fn load_tracker_config(
    path: Option<&Path>,
    gray_threshold: Option<u8>,
    min_area: Option<f64>,
) -> Result<TrackerConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            parse_tracker_config(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => TrackerConfig::default(),
    };

    if let Some(threshold) = gray_threshold {
        config = config.with_gray_threshold(threshold);
    }
    if let Some(area) = min_area {
        config = config.with_min_area(area);
    }
    Ok(config)
}

pub fn parse_tracker_config(text: &str) -> Result<TrackerConfig> {
    Ok(serde_json::from_str(text)?)
}

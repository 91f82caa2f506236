pub mod analyzer;
pub mod chart;
pub mod config;
pub mod display;
pub mod report;

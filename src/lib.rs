pub mod browser;
pub mod config;
pub mod export;
pub mod listing;
pub mod output;
pub mod rank;
pub mod scoring;
pub mod stats;
pub mod telemetry;

pub mod config;
pub mod dispatch;
pub mod error;
pub mod ingest;
pub mod report;
pub mod samples;
pub mod scoring;
pub mod telemetry;

pub use scoring::{
    ClassificationResult, Priority, RecommendedAction, ScoringConfig, ScoringEngine, ScoringError,
};
pub use error::AppError;

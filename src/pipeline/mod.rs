pub mod aggregate;
pub mod classify;
pub mod error;
pub mod keywords;
pub mod processor;
pub mod segmentation;
pub mod theme;

pub use aggregate::{aggregate, Statistics};
pub use error::ConfigError;
pub use processor::{ExamPipeline, ExamReport};

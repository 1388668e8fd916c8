pub mod config;
pub mod models;
pub mod pipeline;
pub mod pipeline_config;

pub use models::{ClassifiedQuestion, Document, DocumentMeta, Field, QuestionUnit};
pub use pipeline::keywords::{KeywordModel, TermsCatalog};
pub use pipeline::{aggregate, ConfigError, ExamPipeline, ExamReport, Statistics};
pub use pipeline_config::PipelineConfig;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Logs go to stderr so report JSON on stdout stays clean. `RUST_LOG`
/// overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

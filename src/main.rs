use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use kakomon_lib::{
    config, Document, DocumentMeta, ExamPipeline, ExamReport, KeywordModel, PipelineConfig,
    Statistics, TermsCatalog,
};

/// Segment and classify OCR'd exam text files.
#[derive(Parser, Debug)]
#[command(name = "kakomon", version, about, long_about = None)]
struct Cli {
    /// Pipeline config JSON (defaults apply to missing keys)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keyword model JSON (default: built-in tables)
    #[arg(long)]
    model: Option<PathBuf>,

    /// Terms catalog JSON (default: ~/Kakomon/terms_catalog/terms.json if present)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// School name attached to every input file
    #[arg(long)]
    school: Option<String>,

    /// Exam year attached to every input file
    #[arg(long)]
    year: Option<i32>,

    /// Override the configured major question bound
    #[arg(long)]
    max_major: Option<u32>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// UTF-8 text files, one exam each
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Serialize)]
struct Output {
    documents: Vec<ExamReport>,
    statistics: Statistics,
}

fn main() -> Result<()> {
    kakomon_lib::init_tracing();
    let cli = Cli::parse();

    let mut pipeline_config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading pipeline config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(max_major) = cli.max_major {
        pipeline_config.max_major = max_major;
    }

    let model = match &cli.model {
        Some(path) => KeywordModel::from_file(path)
            .with_context(|| format!("loading keyword model {}", path.display()))?,
        None => KeywordModel::builtin().context("building built-in keyword model")?,
    };

    let catalog_path = cli
        .catalog
        .clone()
        .unwrap_or_else(config::default_terms_catalog_path);
    let catalog = TermsCatalog::load_optional(&catalog_path);

    let pipeline = ExamPipeline::new(pipeline_config, model, catalog)
        .context("invalid pipeline configuration")?;

    let meta = DocumentMeta {
        school: cli.school.clone(),
        year: cli.year,
    };
    let documents = cli
        .files
        .iter()
        .map(|path| {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(Document::new(text, meta.clone()))
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        files = documents.len(),
        model = pipeline.model_version(),
        "{} v{} analyzing",
        config::APP_NAME,
        config::APP_VERSION
    );

    let reports = pipeline.analyze_batch(&documents);
    let output = Output {
        statistics: Statistics::from_reports(&reports),
        documents: reports,
    };

    let json = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");
    Ok(())
}

//! Exam analysis orchestrator.
//!
//! Single entry point that drives the full pipeline for one document:
//! segment → classify → extract theme → annotate. Statistics are derived
//! from the resulting report on demand.
//!
//! The keyword model and terms catalog are shared read-only across stages
//! and across documents, so `analyze_batch` fans out without locking.

use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{ClassifiedQuestion, Document, DocumentMeta, QuestionUnit};
use crate::pipeline::aggregate::{aggregate, aggregate_document, Statistics};
use crate::pipeline::classify::{
    detect_format, detect_resources, fold_width, is_current_affairs, FieldClassifier,
};
use crate::pipeline::error::ConfigError;
use crate::pipeline::keywords::{KeywordModel, TermsCatalog};
use crate::pipeline::segmentation::Segmenter;
use crate::pipeline::theme::ThemeExtractor;
use crate::pipeline_config::PipelineConfig;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Classified questions of one document, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamReport {
    pub document_id: Uuid,
    pub meta: DocumentMeta,
    pub questions: Vec<ClassifiedQuestion>,
}

impl ExamReport {
    /// Recomputed on every call.
    pub fn statistics(&self) -> Statistics {
        aggregate_document(&self.meta, &self.questions)
    }
}

impl Statistics {
    /// Statistics across several reports.
    pub fn from_reports(reports: &[ExamReport]) -> Self {
        aggregate(
            reports
                .iter()
                .flat_map(|r| r.questions.iter().map(move |q| (&r.meta, q))),
        )
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ExamPipeline {
    segmenter: Segmenter,
    classifier: FieldClassifier,
    extractor: ThemeExtractor,
    model_version: String,
}

impl ExamPipeline {
    /// Validate `config` and `model` and build every stage.
    ///
    /// This is the only fallible step. Once built, analysis never fails.
    pub fn new(
        config: PipelineConfig,
        model: KeywordModel,
        catalog: Option<TermsCatalog>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let model = Arc::new(model.prepare()?);
        let catalog = catalog.map(Arc::new);

        tracing::info!(
            model = %model.version,
            catalog_terms = catalog.as_ref().map_or(0, |c| c.len()),
            max_major = config.max_major,
            "Exam pipeline ready"
        );

        Ok(Self {
            segmenter: Segmenter::from_config(&config),
            classifier: FieldClassifier::new(Arc::clone(&model), &config),
            extractor: ThemeExtractor::new(Arc::clone(&model), catalog, &config),
            model_version: model.version.clone(),
        })
    }

    /// Built-in keyword model, default config, no catalog.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::new(PipelineConfig::default(), KeywordModel::builtin()?, None)
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    pub fn analyze(&self, document: &Document) -> ExamReport {
        let units = self.segmenter.segment(document.text());
        let questions: Vec<ClassifiedQuestion> =
            units.into_iter().map(|unit| self.analyze_unit(unit)).collect();

        let themed = questions.iter().filter(|q| !q.theme.rejected).count();
        tracing::info!(
            document_id = %document.id(),
            school = document.meta().school.as_deref().unwrap_or("-"),
            questions = questions.len(),
            themed,
            "Document analyzed"
        );

        ExamReport {
            document_id: document.id(),
            meta: document.meta().clone(),
            questions,
        }
    }

    /// Analyze documents in parallel. Output order matches input order.
    pub fn analyze_batch(&self, documents: &[Document]) -> Vec<ExamReport> {
        documents.par_iter().map(|doc| self.analyze(doc)).collect()
    }

    fn analyze_unit(&self, unit: QuestionUnit) -> ClassifiedQuestion {
        let folded = fold_width(&unit.raw_text);
        let classification = self.classifier.classify_folded(&folded);
        let theme = self.extractor.extract_folded(&folded, classification.field);

        tracing::debug!(
            unit = %unit.display_id(),
            field = %classification.field,
            theme = theme.reportable().unwrap_or("-"),
            "Unit classified"
        );

        ClassifiedQuestion {
            format: detect_format(&folded),
            resources: detect_resources(&folded),
            current_affairs: is_current_affairs(&folded),
            unit,
            classification,
            theme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Field, ThemeSource};
    use crate::pipeline::keywords::WeightedKeyword;

    fn make_pipeline() -> ExamPipeline {
        ExamPipeline::new(
            PipelineConfig {
                min_marker_distance: 10,
                ..Default::default()
            },
            KeywordModel::builtin().unwrap(),
            None,
        )
        .unwrap()
    }

    const EXAM: &str = "1 次の文章を読んで、各問いに答えなさい。\n\
問1 鎌倉幕府の成立について説明しなさい。\n\
問2 唐の都である長安の様子について答えなさい。\n\
2 次の地図を見て、各問いに答えなさい。\n\
問1 関東平野の気候と農業の特色を答えなさい。\n\
問2 下線部①について\n";

    #[test]
    fn invalid_config_fails_fast() {
        let err = ExamPipeline::new(
            PipelineConfig {
                max_major: 0,
                ..Default::default()
            },
            KeywordModel::builtin().unwrap(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "max_major", .. }));
    }

    #[test]
    fn invalid_model_fails_fast() {
        let mut model = KeywordModel::builtin().unwrap();
        model
            .fields
            .insert(Field::Civics, vec![WeightedKeyword::new("", 1.0)]);
        assert!(ExamPipeline::new(PipelineConfig::default(), model, None).is_err());
    }

    #[test]
    fn empty_document_yields_empty_report() {
        let report = make_pipeline().analyze(&Document::from_text(""));
        assert!(report.questions.is_empty());
        let stats = report.statistics();
        assert_eq!(stats.total_questions, 0);
        assert_eq!(stats.themed, 0);
    }

    #[test]
    fn end_to_end_fields_and_themes() {
        let doc = Document::new(EXAM, DocumentMeta::new("開成中学校", 2024));
        let report = make_pipeline().analyze(&doc);
        assert_eq!(report.document_id, doc.id());
        assert_eq!(report.questions.len(), 4);

        let fields: Vec<Field> = report
            .questions
            .iter()
            .map(|q| q.classification.field)
            .collect();
        assert_eq!(fields[0], Field::History);
        assert_eq!(fields[1], Field::History);
        assert_eq!(fields[2], Field::Geography);

        let first = &report.questions[0];
        assert_eq!(first.theme.reportable(), Some("鎌倉幕府の成立"));
        assert_eq!(first.theme.source, ThemeSource::CuratedMapping);

        let last = &report.questions[3];
        assert!(last.theme.rejected);
        assert!(last.theme.theme.is_none());
    }

    #[test]
    fn units_keep_document_offsets() {
        let doc = Document::from_text(EXAM);
        let report = make_pipeline().analyze(&doc);
        for q in &report.questions {
            assert_eq!(&doc.text()[q.unit.char_range.clone()], q.unit.raw_text);
        }
    }

    #[test]
    fn batch_matches_sequential() {
        let pipeline = make_pipeline();
        let docs: Vec<Document> = (0..6)
            .map(|i| Document::new(EXAM, DocumentMeta::new(format!("学校{i}"), 2020 + i)))
            .collect();
        let batch = pipeline.analyze_batch(&docs);
        let sequential: Vec<ExamReport> = docs.iter().map(|d| pipeline.analyze(d)).collect();
        assert_eq!(batch, sequential);
    }

    #[test]
    fn statistics_across_reports() {
        let pipeline = make_pipeline();
        let docs = vec![
            Document::new(EXAM, DocumentMeta::new("開成中学校", 2024)),
            Document::new(EXAM, DocumentMeta::new("麻布中学校", 2024)),
        ];
        let reports = pipeline.analyze_batch(&docs);
        let stats = Statistics::from_reports(&reports);
        assert_eq!(stats.total_questions, 8);
        assert_eq!(stats.by_document.len(), 2);
        assert_eq!(stats.theme_count("鎌倉幕府の成立"), 2);
        assert_eq!(stats, Statistics::from_reports(&reports));
    }
}

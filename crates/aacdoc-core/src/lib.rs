//! aacdoc-core - Lesson content to document blocks
//!
//! Validates model-generated lesson content, derives the rubric scoring bands
//! and lays everything out as `aacdoc_ast` blocks ready for any renderer.
//!
//! # Example
//!
//! ```
//! use aacdoc_core::{preview, EvaluationAssetTable, LayoutEngine};
//!
//! let raw = r#"{
//!     "evaluation_asset_title": "洗手評估",
//!     "evaluation_items": [{
//!         "evaluation_item_title": "打開水龍頭",
//!         "evaluation_metric": "能否自行打開",
//!         "score_descriptions": {
//!             "excellent_with_score_4": "順利打開",
//!             "good_with_score_3": "稍有遲疑",
//!             "fair_with_score_2": "需要提示",
//!             "needs_improvement_with_score_1": "無法打開"
//!         }
//!     }]
//! }"#;
//!
//! let table = EvaluationAssetTable::from_json(raw).unwrap();
//! let doc = LayoutEngine::new().layout_evaluation(&table).unwrap();
//! assert!(preview(&doc).contains("# 評估表"));
//! ```

pub mod error;
pub mod fingerprint;
pub mod layout;
pub mod preview;
pub mod profile;
pub mod schema;
pub mod scoring;

// Re-export main types and functions
pub use error::{CoreError, Result};
pub use fingerprint::ContentFingerprint;
pub use layout::{labels, DocumentHeader, LayoutEngine};
pub use preview::{preview, PreviewConfig, PreviewGenerator};
pub use profile::{StudentProfile, NOT_PROVIDED};
pub use schema::{
    ActivityGuide, AssessmentMethod, EvaluationAssetTable, EvaluationItem, LearningAsset,
    LessonPlan, Question, ScoreLevelDescriptions, SelfAssessmentItem, TeachingMethod,
    TeachingStep, TitledItem, WorksheetSection,
};
pub use scoring::{score_bands, ScoreBand, ScoreBands, ScoreLevel, ScoreRange};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

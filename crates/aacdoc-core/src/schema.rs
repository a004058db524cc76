//! Content schema
//!
//! Typed contracts for the content a model call produces: the learning asset
//! (lesson plan + worksheet) and the evaluation rubric. Raw payloads go through
//! [`normalize_learning_asset`] / [`normalize_evaluation`] exactly once, then a
//! strict serde parse. Nothing downstream inspects payload shape again.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};

/// Document name used in errors about the learning asset
pub const LEARNING_ASSET: &str = "learning asset";
/// Document name used in errors about the evaluation rubric
pub const EVALUATION_TABLE: &str = "evaluation table";

/// A titled, explained entry (teaching method, teaching step, assessment method)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitledItem {
    pub title: String,
    pub explanation: String,
}

pub type TeachingMethod = TitledItem;
pub type TeachingStep = TitledItem;
pub type AssessmentMethod = TitledItem;

/// A practice, reflection or assessment question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
}

/// An activity guide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityGuide {
    pub description: String,
}

/// A self-assessment item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfAssessmentItem {
    pub item: String,
}

/// The lesson plan (教案)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonPlan {
    pub title: String,
    /// Free text; multiple objectives are separated by line breaks
    pub objectives: String,
    pub content: Vec<String>,
    pub teaching_methods: Vec<TeachingMethod>,
    pub teaching_steps: Vec<TeachingStep>,
    pub assessment_methods: Vec<AssessmentMethod>,
}

/// The worksheet (學習單)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetSection {
    pub practice_questions: Vec<Question>,
    pub activity_guides: Vec<ActivityGuide>,
    pub reflection_questions: Vec<Question>,
    pub assessment_questions: Vec<Question>,
    pub self_assessment_items: Vec<SelfAssessmentItem>,
    pub collaborative_learning_activity: String,
}

/// One model call's worth of lesson content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningAsset {
    pub lesson_plan: LessonPlan,
    pub worksheet: WorksheetSection,
}

/// Descriptions for the four score levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLevelDescriptions {
    /// 優良（4分）
    pub excellent_with_score_4: String,
    /// 良好（3分）
    pub good_with_score_3: String,
    /// 尚可（2分）
    pub fair_with_score_2: String,
    /// 待加強（1分）
    pub needs_improvement_with_score_1: String,
}

/// One row of the evaluation rubric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationItem {
    pub evaluation_item_title: String,
    pub evaluation_metric: String,
    pub score_descriptions: ScoreLevelDescriptions,
}

/// The evaluation rubric (評估表)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationAssetTable {
    pub evaluation_asset_title: String,
    pub evaluation_items: Vec<EvaluationItem>,
}

impl LearningAsset {
    /// Validate a JSON string against the schema
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).map_err(|source| {
            CoreError::SchemaValidation {
                document: LEARNING_ASSET,
                source,
            }
        })?;
        Self::from_value(value)
    }

    /// Normalize loosely shaped fields, then validate against the schema
    pub fn from_value(mut value: Value) -> Result<Self> {
        normalize_learning_asset(&mut value);
        serde_json::from_value(value).map_err(|source| CoreError::SchemaValidation {
            document: LEARNING_ASSET,
            source,
        })
    }
}

impl EvaluationAssetTable {
    /// Validate a JSON string against the schema
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).map_err(|source| {
            CoreError::SchemaValidation {
                document: EVALUATION_TABLE,
                source,
            }
        })?;
        Self::from_value(value)
    }

    /// Normalize loosely shaped fields, then validate against the schema
    pub fn from_value(mut value: Value) -> Result<Self> {
        normalize_evaluation(&mut value);
        serde_json::from_value(value).map_err(|source| CoreError::SchemaValidation {
            document: EVALUATION_TABLE,
            source,
        })
    }
}

impl LessonPlan {
    /// Objectives split into non-empty lines
    pub fn objective_lines(&self) -> Vec<String> {
        self.objectives
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Fields of the lesson plan that hold lists
const LESSON_PLAN_LISTS: &[&str] = &[
    "content",
    "teaching_methods",
    "teaching_steps",
    "assessment_methods",
];

/// Fields of the worksheet that hold lists
const WORKSHEET_LISTS: &[&str] = &[
    "practice_questions",
    "activity_guides",
    "reflection_questions",
    "assessment_questions",
    "self_assessment_items",
];

/// Bring a raw learning-asset payload into the strict schema shape.
///
/// - list fields delivered as JSON-encoded text are decoded
/// - `content` delivered as plain text becomes a one-item list
/// - `objectives` delivered as a list is joined with line breaks
///
/// Anything else is left untouched for the strict parse to judge.
pub fn normalize_learning_asset(value: &mut Value) {
    if let Some(plan) = value.get_mut("lesson_plan") {
        decode_embedded(plan);
        for field in LESSON_PLAN_LISTS {
            if let Some(v) = plan.get_mut(*field) {
                decode_list_field(v, *field == "content");
            }
        }
        if let Some(objectives) = plan.get_mut("objectives") {
            decode_embedded(objectives);
            let joined = match objectives {
                Value::Array(items) => Some(
                    items
                        .iter()
                        .map(value_text)
                        .collect::<Vec<_>>()
                        .join("\n"),
                ),
                _ => None,
            };
            if let Some(joined) = joined {
                *objectives = Value::String(joined);
            }
        }
    }
    if let Some(sheet) = value.get_mut("worksheet") {
        decode_embedded(sheet);
        for field in WORKSHEET_LISTS {
            if let Some(v) = sheet.get_mut(*field) {
                decode_list_field(v, false);
            }
        }
    }
}

/// Bring a raw evaluation payload into the strict schema shape
pub fn normalize_evaluation(value: &mut Value) {
    if let Some(items) = value.get_mut("evaluation_items") {
        decode_list_field(items, false);
        if let Value::Array(items) = items {
            for item in items {
                decode_embedded(item);
                if let Some(desc) = item.get_mut("score_descriptions") {
                    decode_embedded(desc);
                }
            }
        }
    }
}

/// Replace a string holding a JSON array/object with the decoded value
fn decode_embedded(value: &mut Value) {
    let decoded = match value {
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.starts_with('[') || trimmed.starts_with('{') {
                serde_json::from_str::<Value>(trimmed).ok()
            } else {
                None
            }
        }
        _ => None,
    };
    if let Some(decoded) = decoded {
        *value = decoded;
    }
}

fn decode_list_field(value: &mut Value, wrap_plain: bool) {
    decode_embedded(value);
    if !wrap_plain {
        return;
    }
    let wrapped = match value {
        Value::String(text) if text.trim().is_empty() => Some(Vec::new()),
        Value::String(text) => Some(vec![Value::String(text.clone())]),
        _ => None,
    };
    if let Some(items) = wrapped {
        *value = Value::Array(items);
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

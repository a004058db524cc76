//! Structured content generation
//!
//! Fills the prompt templates, asks the model for both documents at once
//! and parses each reply through the content schema.

use aacdoc_core::{EvaluationAssetTable, LearningAsset};
use tracing::info;

use crate::backend::CaseMaterials;
use crate::error::Result;
use crate::llm::{
    evaluation_schema, learning_asset_schema, LlmClient, DEFAULT_ASSET_MODEL,
    DEFAULT_EVALUATION_MODEL,
};
use crate::prompts::{fill_template, AAC_EVALUATION_PROMPT, AAC_TUTORIAL_PROMPT};

/// Models used for each document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    /// Lesson plan and worksheet model
    pub asset: String,
    /// Evaluation rubric model
    pub evaluation: String,
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self {
            asset: DEFAULT_ASSET_MODEL.to_string(),
            evaluation: DEFAULT_EVALUATION_MODEL.to_string(),
        }
    }
}

/// Both generated documents
#[derive(Debug, Clone)]
pub struct GeneratedContent {
    pub learning_asset: LearningAsset,
    pub evaluation: EvaluationAssetTable,
}

/// Generates lesson content from a case summary and worksheet prompt
#[derive(Debug, Clone)]
pub struct ContentGenerator {
    llm: LlmClient,
    models: ModelSelection,
}

impl ContentGenerator {
    /// Create a generator with the default models
    pub fn new(llm: LlmClient) -> Self {
        Self::with_models(llm, ModelSelection::default())
    }

    /// Create a generator with explicit models
    pub fn with_models(llm: LlmClient, models: ModelSelection) -> Self {
        Self { llm, models }
    }

    /// Models in use
    pub fn models(&self) -> &ModelSelection {
        &self.models
    }

    /// Generate the lesson plan and worksheet
    pub async fn generate_learning_asset(
        &self,
        case_info: &str,
        contents: &str,
    ) -> Result<LearningAsset> {
        let system = fill_template(AAC_TUTORIAL_PROMPT, case_info, contents);
        let raw = self
            .llm
            .complete_json(
                &self.models.asset,
                &system,
                "LearningAsset",
                learning_asset_schema(),
            )
            .await?;
        Ok(LearningAsset::from_json(&raw)?)
    }

    /// Generate the evaluation rubric
    pub async fn generate_evaluation(
        &self,
        case_info: &str,
        contents: &str,
    ) -> Result<EvaluationAssetTable> {
        let system = fill_template(AAC_EVALUATION_PROMPT, case_info, contents);
        let raw = self
            .llm
            .complete_json(
                &self.models.evaluation,
                &system,
                "EvaluationAssetTable",
                evaluation_schema(),
            )
            .await?;
        Ok(EvaluationAssetTable::from_json(&raw)?)
    }

    /// Generate both documents concurrently. Either failure fails both.
    pub async fn generate(&self, materials: &CaseMaterials) -> Result<GeneratedContent> {
        let case_info = materials.profile.case_info();
        let contents = materials.prompt_content.as_str();

        let (learning_asset, evaluation) = tokio::try_join!(
            self.generate_learning_asset(&case_info, contents),
            self.generate_evaluation(&case_info, contents),
        )?;
        info!(
            lesson = %learning_asset.lesson_plan.title,
            evaluation_items = evaluation.evaluation_items.len(),
            "content generated"
        );

        Ok(GeneratedContent {
            learning_asset,
            evaluation,
        })
    }
}

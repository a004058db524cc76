//! Table/section layout engine
//!
//! Turns validated content into the renderer-agnostic block sequence defined
//! in `aacdoc-ast`. Every renderer (PDF, DOCX, preview) consumes the output of
//! this module unchanged, so ordering, numbering and table shapes are decided
//! here and nowhere else.

use aacdoc_ast::{numbered, Alignment, Block, ColumnSpec, Document, GridTable, NumberedList};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::schema::{
    EvaluationAssetTable, LearningAsset, LessonPlan, TitledItem, WorksheetSection,
    EVALUATION_TABLE, LEARNING_ASSET,
};
use crate::scoring::{score_bands, ScoreLevel};

/// Fixed labels and headings printed on the documents
pub mod labels {
    pub const LESSON_PLAN: &str = "教案";
    pub const CASE_INFO: &str = "個案資料";

    pub const PLAN_TITLE: &str = "教案名稱";
    pub const PLAN_OBJECTIVES: &str = "教學目標";
    pub const PLAN_CONTENT: &str = "教學內容";
    pub const PLAN_METHODS: &str = "教學方法";
    pub const PLAN_STEPS: &str = "教學步驟";
    pub const PLAN_ASSESSMENT: &str = "評量方式";

    /// Key/value rows of the lesson plan, in display order
    pub const LESSON_PLAN_ROWS: [&str; 6] = [
        PLAN_TITLE,
        PLAN_OBJECTIVES,
        PLAN_CONTENT,
        PLAN_METHODS,
        PLAN_STEPS,
        PLAN_ASSESSMENT,
    ];

    pub const WORKSHEET: &str = "學習單";
    pub const PRACTICE: &str = "一、練習題";
    pub const ACTIVITIES: &str = "二、活動指導";
    pub const REFLECTION: &str = "三、反思問題";
    pub const ASSESSMENT: &str = "四、評量題";
    pub const SELF_ASSESSMENT: &str = "五、自我評估表";
    pub const COLLABORATION: &str = "六、合作學習活動";

    pub const SELF_ASSESSMENT_HEADER: [&str; 4] = ["評估項目", "滿意(V)", "需改進(X)", "反思與改進方法"];
    pub const SELF_ASSESSMENT_WIDTHS: [u32; 4] = [8, 3, 3, 4];

    pub const EVALUATION: &str = "評估表";
    pub const EVALUATION_ITEM: &str = "評量項目";
    pub const EVALUATION_METRIC: &str = "評量指標";
    pub const SCORING_CRITERIA: &str = "評分標準";
}

/// Presentation strings printed at the top of the learning asset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHeader {
    pub main_title: String,
    pub sub_title: String,
    /// Case summary, embedded verbatim
    pub case_info: String,
}

impl DocumentHeader {
    pub fn new(
        main_title: impl Into<String>,
        sub_title: impl Into<String>,
        case_info: impl Into<String>,
    ) -> Self {
        Self {
            main_title: main_title.into(),
            sub_title: sub_title.into(),
            case_info: case_info.into(),
        }
    }

    /// `{main} - {sub}`
    pub fn heading(&self) -> String {
        format!("{} - {}", self.main_title, self.sub_title)
    }
}

/// Maps content onto document blocks
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    header: Option<DocumentHeader>,
}

impl LayoutEngine {
    /// Engine without a document header
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine that prints `header` at the top of the learning asset
    pub fn with_header(header: DocumentHeader) -> Self {
        Self {
            header: Some(header),
        }
    }

    pub fn header(&self) -> Option<&DocumentHeader> {
        self.header.as_ref()
    }

    /// Lay out the lesson plan and worksheet.
    ///
    /// The result holds two sections: the lesson plan, then the worksheet.
    /// Each section ends with a page break.
    pub fn layout_learning_asset(&self, asset: &LearningAsset) -> Result<Document> {
        let mut doc = Document::with_title(labels::LESSON_PLAN);
        doc.metadata.subject = Some(asset.lesson_plan.title.clone());
        if let Some(header) = &self.header {
            doc.metadata.set_attribute("main-title", header.main_title.clone());
            doc.metadata.set_attribute("sub-title", header.sub_title.clone());
        }

        doc.push(Block::Title(labels::LESSON_PLAN.to_string()));
        if let Some(header) = &self.header {
            doc.push(Block::heading(2, header.heading()));
            doc.push(Block::heading(3, labels::CASE_INFO));
            let case_info = header.case_info.trim();
            if !case_info.is_empty() {
                doc.push(Block::paragraph(case_info));
            }
        }
        for block in lesson_plan_rows(&asset.lesson_plan)? {
            doc.push(block);
        }
        doc.push(Block::PageBreak);

        doc.push(Block::heading(1, labels::WORKSHEET));
        for block in worksheet_blocks(&asset.worksheet) {
            doc.push(block);
        }
        doc.push(Block::PageBreak);
        Ok(doc)
    }

    /// Lay out the evaluation rubric and its scoring criteria.
    ///
    /// The result is one section ending with a page break.
    pub fn layout_evaluation(&self, table: &EvaluationAssetTable) -> Result<Document> {
        let bands = score_bands(table.evaluation_items.len())?;
        require(
            &table.evaluation_asset_title,
            EVALUATION_TABLE,
            "evaluation_asset_title",
        )?;

        let mut doc = Document::with_title(labels::EVALUATION);
        doc.metadata.subject = Some(table.evaluation_asset_title.clone());
        doc.push(Block::Title(labels::EVALUATION.to_string()));
        doc.push(Block::heading(1, table.evaluation_asset_title.clone()));

        let mut header = vec![
            labels::EVALUATION_ITEM.to_string(),
            labels::EVALUATION_METRIC.to_string(),
        ];
        header.extend(ScoreLevel::ALL.iter().map(|level| level.column_header()));

        let mut rows = Vec::with_capacity(table.evaluation_items.len());
        for item in &table.evaluation_items {
            require(
                &item.evaluation_item_title,
                EVALUATION_TABLE,
                "evaluation_item_title",
            )?;
            let scores = &item.score_descriptions;
            rows.push(vec![
                item.evaluation_item_title.clone(),
                item.evaluation_metric.clone(),
                scores.excellent_with_score_4.clone(),
                scores.good_with_score_3.clone(),
                scores.fair_with_score_2.clone(),
                scores.needs_improvement_with_score_1.clone(),
            ]);
        }
        let columns = vec![ColumnSpec::new(1, Alignment::Left); header.len()];
        doc.push(Block::GridTable(GridTable {
            header,
            rows,
            columns,
            wrap: true,
        }));

        doc.push(Block::heading(1, labels::SCORING_CRITERIA));
        for line in bands.lines() {
            doc.push(Block::paragraph(line));
        }
        doc.push(Block::PageBreak);
        Ok(doc)
    }
}

fn require(value: &str, document: &'static str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        Err(CoreError::Layout { document, field })
    } else {
        Ok(())
    }
}

/// `"{n}. {title}: {explanation}"` for every record
fn titled_lines(items: &[TitledItem]) -> Vec<String> {
    numbered(
        items
            .iter()
            .map(|item| format!("{}: {}", item.title, item.explanation)),
    )
}

fn lesson_plan_rows(plan: &LessonPlan) -> Result<Vec<Block>> {
    require(&plan.title, LEARNING_ASSET, "lesson_plan.title")?;
    Ok(vec![
        Block::key_value(labels::PLAN_TITLE, vec![plan.title.clone()]),
        Block::key_value(labels::PLAN_OBJECTIVES, plan.objective_lines()),
        Block::key_value(labels::PLAN_CONTENT, numbered(&plan.content)),
        Block::key_value(labels::PLAN_METHODS, titled_lines(&plan.teaching_methods)),
        Block::key_value(labels::PLAN_STEPS, titled_lines(&plan.teaching_steps)),
        Block::key_value(
            labels::PLAN_ASSESSMENT,
            titled_lines(&plan.assessment_methods),
        ),
    ])
}

fn worksheet_blocks(sheet: &WorksheetSection) -> Vec<Block> {
    let list = |items: Vec<&str>| Block::NumberedList(NumberedList::new(items));
    let mut blocks = vec![
        Block::heading(2, labels::PRACTICE),
        list(sheet.practice_questions.iter().map(|q| q.question.as_str()).collect()),
        Block::heading(2, labels::ACTIVITIES),
        list(sheet.activity_guides.iter().map(|g| g.description.as_str()).collect()),
        Block::heading(2, labels::REFLECTION),
        list(sheet.reflection_questions.iter().map(|q| q.question.as_str()).collect()),
        Block::heading(2, labels::ASSESSMENT),
        list(sheet.assessment_questions.iter().map(|q| q.question.as_str()).collect()),
        Block::heading(2, labels::SELF_ASSESSMENT),
    ];

    blocks.push(Block::GridTable(GridTable {
        header: labels::SELF_ASSESSMENT_HEADER
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows: sheet
            .self_assessment_items
            .iter()
            .map(|item| vec![item.item.clone(), String::new(), String::new(), String::new()])
            .collect(),
        columns: labels::SELF_ASSESSMENT_WIDTHS
            .iter()
            .map(|&w| ColumnSpec::new(w, Alignment::Center))
            .collect(),
        wrap: true,
    }));

    blocks.push(Block::heading(2, labels::COLLABORATION));
    blocks.push(Block::paragraph(sheet.collaborative_learning_activity.clone()));
    blocks
}

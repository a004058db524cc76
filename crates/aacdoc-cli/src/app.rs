//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use aacdoc_client::{BackendClient, ContentGenerator, LlmClient};
use aacdoc_core::{DocumentHeader, EvaluationAssetTable, LearningAsset};
use aacdoc_ooxml::DocxOptions;
use aacdoc_pdf::FontResource;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::cache::{Session, SessionContent};
use crate::config::Settings;
use crate::export::{ExportFormat, Exporter};

/// Main title used when none is given and the content has no title
pub const DEFAULT_MAIN_TITLE: &str = "教案";
/// Sub title used when none is given and the content has no title
pub const DEFAULT_SUB_TITLE: &str = "評估表";

/// Which formats to export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RenderFormat {
    /// PDF only
    Pdf,
    /// DOCX only
    Docx,
    /// PDF and DOCX
    #[default]
    All,
}

impl RenderFormat {
    /// Formats to export, in order
    pub fn formats(self) -> Vec<ExportFormat> {
        match self {
            RenderFormat::Pdf => vec![ExportFormat::Pdf],
            RenderFormat::Docx => vec![ExportFormat::Docx],
            RenderFormat::All => ExportFormat::ALL.to_vec(),
        }
    }

    fn needs_font(self) -> bool {
        self.formats().contains(&ExportFormat::Pdf)
    }
}

#[derive(Parser)]
#[command(name = "aacdoc")]
#[command(author, version, about = "Lesson plans, worksheets and rubrics as PDF and DOCX", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./aacdoc.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Content files and header strings
#[derive(Args, Debug, Clone, Default)]
pub struct ContentArgs {
    /// Learning asset JSON (lesson plan + worksheet)
    #[arg(long)]
    pub asset: Option<PathBuf>,

    /// Evaluation table JSON
    #[arg(long)]
    pub evaluation: Option<PathBuf>,

    /// Main title (default: the lesson plan title)
    #[arg(long)]
    pub main_title: Option<String>,

    /// Sub title (default: the evaluation title)
    #[arg(long)]
    pub sub_title: Option<String>,

    /// Text file with the case summary printed under the header
    #[arg(long)]
    pub case_info: Option<PathBuf>,
}

/// Where and how to write exports
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Formats to export
    #[arg(short, long, value_enum, default_value = "all")]
    pub format: RenderFormat,

    /// Output directory (default: render.output_dir from the config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Font file for PDF output (default: render.font_path from the config)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Family name provided by the font file
    #[arg(long)]
    pub font_family: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render content files to PDF and/or DOCX
    Render {
        #[command(flatten)]
        content: ContentArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the Markdown preview of content files
    Preview {
        #[command(flatten)]
        content: ContentArgs,
    },

    /// Fetch a case from the backend, generate content and export it
    Generate {
        /// Caller's backend key
        #[arg(long)]
        api_key: String,

        /// Board whose worksheet prompt is used
        #[arg(long)]
        board_id: String,

        /// Main title (default: the generated lesson plan title)
        #[arg(long)]
        main_title: Option<String>,

        /// Sub title (default: the generated evaluation title)
        #[arg(long)]
        sub_title: Option<String>,

        /// Also print the Markdown preview
        #[arg(long)]
        preview: bool,

        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Render { content, output } => {
            render_command(&content, &output, &settings)?;
        }
        Commands::Preview { content } => {
            let markdown = preview_command(&content)?;
            println!("{}", markdown);
        }
        Commands::Generate {
            api_key,
            board_id,
            main_title,
            sub_title,
            preview,
            output,
        } => {
            let request = GenerateRequest {
                api_key,
                board_id,
                main_title,
                sub_title,
                preview,
            };
            generate_command(&request, &output, &settings)?;
        }
    }

    Ok(())
}

/// Execute the render command. Returns the written files.
pub fn render_command(
    content: &ContentArgs,
    output: &OutputArgs,
    settings: &Settings,
) -> Result<Vec<PathBuf>> {
    println!("aacdoc v{}", aacdoc_core::VERSION);

    let loaded = load_content(content)?;
    let mut session = open_session(output, settings)?;
    session.replace_content(loaded)?;

    write_exports(&mut session, output, settings)
}

/// Execute the preview command
pub fn preview_command(content: &ContentArgs) -> Result<String> {
    let loaded = load_content(content)?;
    let mut session = Session::new(Exporter::new("", ""));
    session.replace_content(loaded)?;
    Ok(session.preview()?)
}

/// Arguments of the generate command
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub api_key: String,
    pub board_id: String,
    pub main_title: Option<String>,
    pub sub_title: Option<String>,
    pub preview: bool,
}

/// Execute the generate command. Returns the written files.
pub fn generate_command(
    request: &GenerateRequest,
    output: &OutputArgs,
    settings: &Settings,
) -> Result<Vec<PathBuf>> {
    println!("aacdoc v{}", aacdoc_core::VERSION);

    // Fail on a bad font before spending any model calls
    let mut session = open_session(output, settings)?;

    let model_key = settings.llm.api_key().with_context(|| {
        format!(
            "Model API key not set; export {} first",
            settings.llm.api_key_env
        )
    })?;
    let backend = BackendClient::with_url(&settings.backend.url, &request.api_key)
        .context("Failed to create backend client")?;
    let llm = LlmClient::with_url(&settings.llm.url, model_key)
        .context("Failed to create model client")?;
    let generator = ContentGenerator::with_models(llm, settings.llm.models());

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let (materials, generated) = runtime.block_on(async {
        println!("  Fetching case data for board {}...", request.board_id);
        let materials = backend
            .fetch_all(&request.board_id)
            .await
            .context("Failed to fetch case data")?;
        println!("  Generating lesson content...");
        let generated = generator
            .generate(&materials)
            .await
            .context("Failed to generate content")?;
        anyhow::Ok((materials, generated))
    })?;

    let header = DocumentHeader::new(
        request
            .main_title
            .clone()
            .unwrap_or_else(|| generated.learning_asset.lesson_plan.title.clone()),
        request
            .sub_title
            .clone()
            .unwrap_or_else(|| generated.evaluation.evaluation_asset_title.clone()),
        materials.profile.case_info(),
    );
    session.replace_content(SessionContent {
        header,
        learning_asset: Some(generated.learning_asset),
        evaluation: Some(generated.evaluation),
    })?;

    if request.preview {
        println!("{}", session.preview()?);
    }
    write_exports(&mut session, output, settings)
}

/// Read and validate the content files
pub fn load_content(args: &ContentArgs) -> Result<SessionContent> {
    if args.asset.is_none() && args.evaluation.is_none() {
        anyhow::bail!("Nothing to render: pass --asset and/or --evaluation");
    }

    let learning_asset = match &args.asset {
        Some(path) => {
            let raw = read_input(path)?;
            Some(
                LearningAsset::from_json(&raw)
                    .with_context(|| format!("Invalid learning asset: {}", path.display()))?,
            )
        }
        None => None,
    };
    let evaluation = match &args.evaluation {
        Some(path) => {
            let raw = read_input(path)?;
            Some(
                EvaluationAssetTable::from_json(&raw)
                    .with_context(|| format!("Invalid evaluation table: {}", path.display()))?,
            )
        }
        None => None,
    };
    let case_info = match &args.case_info {
        Some(path) => read_input(path)?,
        None => String::new(),
    };

    let main_title = args.main_title.clone().unwrap_or_else(|| {
        learning_asset
            .as_ref()
            .map(|a| a.lesson_plan.title.clone())
            .unwrap_or_else(|| DEFAULT_MAIN_TITLE.to_string())
    });
    let sub_title = args.sub_title.clone().unwrap_or_else(|| {
        evaluation
            .as_ref()
            .map(|e| e.evaluation_asset_title.clone())
            .unwrap_or_else(|| DEFAULT_SUB_TITLE.to_string())
    });

    Ok(SessionContent {
        header: DocumentHeader::new(main_title, sub_title, case_info),
        learning_asset,
        evaluation,
    })
}

fn read_input(path: &Path) -> Result<String> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))
}

/// Session with the font loaded when PDF output is requested
fn open_session(output: &OutputArgs, settings: &Settings) -> Result<Session> {
    let family = output
        .font_family
        .clone()
        .unwrap_or_else(|| settings.render.font_family.clone());

    let exporter = if output.format.needs_font() {
        let path = output
            .font
            .clone()
            .or_else(|| settings.render.font_path.clone())
            .context("PDF output needs a font: pass --font or set render.font_path")?;
        let font = FontResource::load(&path, family)
            .with_context(|| format!("Failed to load font: {}", path.display()))?;
        info!(font = %path.display(), family = font.family(), "font loaded");
        Exporter::new("", "").with_font(font)
    } else {
        Exporter::new("", "").with_docx_options(DocxOptions::with_font(family))
    };
    Ok(Session::new(exporter))
}

fn write_exports(
    session: &mut Session,
    output: &OutputArgs,
    settings: &Settings,
) -> Result<Vec<PathBuf>> {
    let output_dir = output
        .output
        .clone()
        .unwrap_or_else(|| settings.render.output_dir.clone());
    fs::create_dir_all(&output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let mut written = Vec::new();
    for format in output.format.formats() {
        let artifact = session
            .export(format)
            .with_context(|| format!("Failed to export {}", format))?;
        let path = output_dir.join(&artifact.filename);
        fs::write(&path, &artifact.bytes)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?;
        println!("  Created: {}", path.display());
        written.push(path);
    }

    println!();
    println!("Export complete!");
    Ok(written)
}

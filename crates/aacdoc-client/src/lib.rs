//! aacdoc-client - Upstream calls for the aacdoc pipeline
//!
//! Two collaborators sit in front of the renderer: the learning backend,
//! which supplies the student profile and the board's worksheet prompt, and
//! a chat-completions model that turns them into structured lesson content.
//! Both are fetched in pairs with `tokio::try_join!`.
//!
//! # Example
//!
//! ```no_run
//! use aacdoc_client::{BackendClient, ContentGenerator, LlmClient};
//!
//! # async fn run() -> aacdoc_client::Result<()> {
//! let backend = BackendClient::new("user-key")?;
//! let materials = backend.fetch_all("42").await?;
//!
//! let generator = ContentGenerator::new(LlmClient::new("sk-...")?);
//! let content = generator.generate(&materials).await?;
//! println!("{}", content.learning_asset.lesson_plan.title);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod error;
pub mod generator;
pub mod llm;
pub mod prompts;

pub use backend::{BackendClient, CaseMaterials, DEFAULT_BACKEND_URL};
pub use error::{ClientError, Result};
pub use generator::{ContentGenerator, GeneratedContent, ModelSelection};
pub use llm::{LlmClient, DEFAULT_ASSET_MODEL, DEFAULT_EVALUATION_MODEL, DEFAULT_LLM_URL};

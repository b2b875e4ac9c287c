// Service exports
pub mod catalog;
pub mod gemini;
pub mod offline;
pub mod openai;
pub mod report;

pub use catalog::{load_catalog, CatalogError};
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use report::{build_prompt, ProviderError, ReportService};

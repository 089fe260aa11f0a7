pub mod llm_service;
pub mod traits;
pub mod url_extractor;

pub use llm_service::LlmService;
pub use traits::{IndexSubmitter, UrlAnalyzer};
pub use url_extractor::{extract_urls, parse_keywords};

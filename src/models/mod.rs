pub mod analysis;
pub mod credential;
pub mod loaders;
pub mod queue_item;

pub use analysis::{AnalysisResult, SubmitOutcome};
pub use credential::ServiceAccountCredential;
pub use loaders::{load_credential, load_input_text};
pub use queue_item::{ItemId, ItemStatus, QualityLabel, QueueItem, RequestKind};

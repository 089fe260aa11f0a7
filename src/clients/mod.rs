pub mod indexing_client;

pub use indexing_client::IndexingClient;

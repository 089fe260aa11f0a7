pub mod input_loader;

pub use input_loader::{load_credential, load_input_text};

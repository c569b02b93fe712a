pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod sampling;
pub mod store;

pub use config::QuotebookConfig;
pub use error::{QuotebookError, StoreError};
pub use models::{Category, NewQuote, NewThinker, Quote, QuotePatch, Thinker, ThinkerPatch};
pub use store::{Collection, Document, MemoryCollection, QuoteCollection, Store};

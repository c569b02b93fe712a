pub mod category;
pub mod quote;
pub mod thinker;

pub use category::Category;
pub use quote::{NewQuote, Quote, QuotePatch};
pub use thinker::{NewThinker, Thinker, ThinkerPatch};

//! Markdown display sinks
//!
//! Rendered responses are handed to a [`MarkdownDisplay`]; printing or
//! persisting them is the sink's concern.

pub mod console;
pub mod mock;

pub use console::{FileDisplay, StdoutDisplay};
pub use mock::MockDisplay;

use crate::Result;

pub trait MarkdownDisplay: Send + Sync {
    fn show(&self, markdown: &str) -> Result<()>;
}

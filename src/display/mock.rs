use super::MarkdownDisplay;
use crate::Result;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct MockDisplay {
    shown: Arc<Mutex<Vec<String>>>,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_shown(&self) -> Vec<String> {
        self.shown.lock().unwrap().clone()
    }

    /// Everything shown so far, joined by newlines.
    pub fn get_output(&self) -> String {
        self.get_shown().join("\n")
    }
}

impl MarkdownDisplay for MockDisplay {
    fn show(&self, markdown: &str) -> Result<()> {
        self.shown.lock().unwrap().push(markdown.to_string());
        Ok(())
    }
}

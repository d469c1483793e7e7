//! Prompts used by the grounding walkthrough.

pub const PRODUCT_QUESTION: &str = include_str!("../data/prompts/product_question.txt");
pub const CURRENT_EVENTS: &str = include_str!("../data/prompts/current_events.txt");
pub const ENTERPRISE_QUESTION: &str = include_str!("../data/prompts/enterprise_question.txt");
pub const CHAT_FIRST: &str = include_str!("../data/prompts/chat_first.txt");
pub const CHAT_FOLLOWUP: &str = include_str!("../data/prompts/chat_followup.txt");

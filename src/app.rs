//! Application orchestration for grounded question answering.

use crate::ai::{ChatSession, GenerativeModel, VertexModel};
use crate::display::{FileDisplay, MarkdownDisplay, StdoutDisplay};
use crate::models::{Config, GroundingKind, GroundingTool};
use crate::render::render_response;
use crate::{prompts, Error, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// Coordinates model calls, rendering and display.
pub struct App {
    model: Box<dyn GenerativeModel>,
    display: Box<dyn MarkdownDisplay>,
    datastore: Option<String>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub model: Box<dyn GenerativeModel>,
    pub display: Box<dyn MarkdownDisplay>,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// `datastore` is the full resource name of the Vertex AI Search data
    /// store, when one is available.
    pub fn with_services(services: AppServices, datastore: Option<String>) -> Self {
        Self {
            model: services.model,
            display: services.display,
            datastore,
        }
    }

    /// Construct an app talking to Vertex AI, printing to stdout or
    /// appending to `output`.
    pub fn new(config: &Config, output: Option<PathBuf>) -> Self {
        let model = VertexModel::new(config);
        info!(
            "Using model {} in {} (project {})",
            model.model(),
            config.location,
            config.project_id
        );

        let display: Box<dyn MarkdownDisplay> = match output {
            Some(path) => {
                info!("Writing responses to {}", path.display());
                Box::new(FileDisplay::new(path))
            }
            None => Box::new(StdoutDisplay),
        };

        Self::with_services(
            AppServices {
                model: Box::new(model),
                display,
            },
            config.datastore_path(),
        )
    }

    /// Resolve a grounding choice against the configured datastore.
    pub fn grounding_tool(&self, kind: GroundingKind) -> Result<GroundingTool> {
        match kind {
            GroundingKind::None => Ok(GroundingTool::None),
            GroundingKind::GoogleSearch => Ok(GroundingTool::GoogleSearch),
            GroundingKind::VertexSearch => self
                .datastore
                .clone()
                .map(|datastore| GroundingTool::VertexSearch { datastore })
                .ok_or_else(|| {
                    Error::Config(
                        "Vertex AI Search grounding needs DATA_STORE_ID to be set".to_string(),
                    )
                }),
        }
    }

    /// Ask a single question and display the rendered answer.
    pub async fn ask(&self, prompt: &str, tool: &GroundingTool) -> Result<()> {
        info!("Asking ({:?}): {}", tool, prompt);

        let response = self.model.generate(prompt, tool).await?;
        let markdown = render_response(&response)?;
        self.display.show(&markdown)
    }

    /// Run `prompts` as consecutive turns of one conversation.
    pub async fn chat(&self, prompts: &[&str], tool: &GroundingTool) -> Result<()> {
        let mut session = ChatSession::new(self.model.as_ref());

        for (turn, prompt) in prompts.iter().enumerate() {
            info!("Chat turn {} ({:?}): {}", turn + 1, tool, prompt);

            let response = session.send_message(prompt, tool).await?;
            self.display.show(&format!("**User:** {}", prompt))?;
            self.display.show(&render_response(&response)?)?;
        }

        Ok(())
    }

    /// Walk through ungrounded, web-grounded, datastore-grounded and
    /// multi-turn grounded generation.
    pub async fn run_demo(&self) -> Result<()> {
        self.section("Without grounding", prompts::PRODUCT_QUESTION)?;
        self.ask(prompts::PRODUCT_QUESTION, &GroundingTool::None)
            .await?;

        self.section("Grounding with Google Search", prompts::PRODUCT_QUESTION)?;
        self.ask(prompts::PRODUCT_QUESTION, &GroundingTool::GoogleSearch)
            .await?;

        self.section("Grounding with Google Search", prompts::CURRENT_EVENTS)?;
        self.ask(prompts::CURRENT_EVENTS, &GroundingTool::GoogleSearch)
            .await?;

        match self.grounding_tool(GroundingKind::VertexSearch) {
            Ok(tool) => {
                self.section("Grounding with Vertex AI Search", prompts::ENTERPRISE_QUESTION)?;
                self.ask(prompts::ENTERPRISE_QUESTION, &tool).await?;
            }
            Err(_) => warn!("DATA_STORE_ID not set, skipping the Vertex AI Search example"),
        }

        self.display
            .show("## Multi-turn chat grounded with Google Search")?;
        self.chat(
            &[prompts::CHAT_FIRST, prompts::CHAT_FOLLOWUP],
            &GroundingTool::GoogleSearch,
        )
        .await?;

        info!("Demo complete");
        Ok(())
    }

    fn section(&self, title: &str, prompt: &str) -> Result<()> {
        self.display
            .show(&format!("## {}\n\n**Prompt:** {}", title, prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockGenerativeModel;
    use crate::display::MockDisplay;
    use crate::models::GenerationResponse;

    const DATASTORE: &str =
        "projects/p/locations/global/collections/default_collection/dataStores/docs";

    fn make_app(
        model: &MockGenerativeModel,
        display: &MockDisplay,
        datastore: Option<&str>,
    ) -> App {
        App::with_services(
            AppServices {
                model: Box::new(model.clone()),
                display: Box::new(display.clone()),
            },
            datastore.map(str::to_string),
        )
    }

    fn grounded(text: &str, title: &str, uri: &str) -> GenerationResponse {
        serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "groundingMetadata": {
                    "webSearchQueries": ["query"],
                    "groundingChunks": [{ "web": { "title": title, "uri": uri } }],
                    "groundingSupports": [{
                        "segment": { "endIndex": text.len() },
                        "groundingChunkIndices": [0]
                    }]
                }
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_grounding_tool_resolution() {
        let model = MockGenerativeModel::new();
        let display = MockDisplay::new();

        let app = make_app(&model, &display, Some(DATASTORE));
        assert_eq!(
            app.grounding_tool(GroundingKind::VertexSearch).unwrap(),
            GroundingTool::VertexSearch {
                datastore: DATASTORE.to_string()
            }
        );
        assert_eq!(
            app.grounding_tool(GroundingKind::GoogleSearch).unwrap(),
            GroundingTool::GoogleSearch
        );

        let app = make_app(&model, &display, None);
        let err = app.grounding_tool(GroundingKind::VertexSearch).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(
            app.grounding_tool(GroundingKind::None).unwrap(),
            GroundingTool::None
        );
    }

    #[tokio::test]
    async fn test_ask_renders_grounded_answer() {
        let model = MockGenerativeModel::new().with_response(grounded(
            "It starts at $399.",
            "store.google.com",
            "https://store.google.com/pixel_tablet",
        ));
        let display = MockDisplay::new();
        let app = make_app(&model, &display, None);

        app.ask(prompts::PRODUCT_QUESTION, &GroundingTool::GoogleSearch)
            .await
            .unwrap();

        let shown = display.get_shown();
        assert_eq!(shown.len(), 1);
        assert!(shown[0].starts_with("It starts at $399. [1]\n"));
        assert!(shown[0].ends_with("1. [store.google.com](https://store.google.com/pixel_tablet)\n"));
        assert_eq!(model.get_requests()[0].tool, GroundingTool::GoogleSearch);
    }

    #[tokio::test]
    async fn test_ask_plain_answer() {
        let model = MockGenerativeModel::new().with_text_response("Plain answer.");
        let display = MockDisplay::new();
        let app = make_app(&model, &display, None);

        app.ask("q", &GroundingTool::None).await.unwrap();

        assert_eq!(display.get_shown(), vec!["Plain answer."]);
    }

    #[tokio::test]
    async fn test_ask_propagates_model_errors() {
        let model = MockGenerativeModel::new().with_error("unauthenticated");
        let display = MockDisplay::new();
        let app = make_app(&model, &display, None);

        let err = app.ask("q", &GroundingTool::None).await.unwrap_err();

        assert!(matches!(err, Error::AiProvider(_)));
        assert!(display.get_shown().is_empty());
    }

    #[tokio::test]
    async fn test_chat_shows_each_turn() {
        let model = MockGenerativeModel::new()
            .with_text_response("first answer")
            .with_text_response("second answer");
        let display = MockDisplay::new();
        let app = make_app(&model, &display, None);

        app.chat(&["one", "two"], &GroundingTool::None)
            .await
            .unwrap();

        assert_eq!(
            display.get_shown(),
            vec![
                "**User:** one",
                "first answer",
                "**User:** two",
                "second answer"
            ]
        );
        assert_eq!(model.get_requests()[1].contents.len(), 3);
    }

    #[tokio::test]
    async fn test_demo_skips_vertex_search_without_datastore() {
        let model = MockGenerativeModel::new();
        let display = MockDisplay::new();
        let app = make_app(&model, &display, None);

        app.run_demo().await.unwrap();

        let tools: Vec<GroundingTool> = model.get_requests().into_iter().map(|r| r.tool).collect();
        assert_eq!(
            tools,
            vec![
                GroundingTool::None,
                GroundingTool::GoogleSearch,
                GroundingTool::GoogleSearch,
                GroundingTool::GoogleSearch,
                GroundingTool::GoogleSearch,
            ]
        );
        assert!(!display.get_output().contains("Vertex AI Search"));
    }

    #[tokio::test]
    async fn test_demo_uses_datastore_when_configured() {
        let model = MockGenerativeModel::new();
        let display = MockDisplay::new();
        let app = make_app(&model, &display, Some(DATASTORE));

        app.run_demo().await.unwrap();

        let requests = model.get_requests();
        assert_eq!(requests.len(), 6);
        assert_eq!(
            requests[3].tool,
            GroundingTool::VertexSearch {
                datastore: DATASTORE.to_string()
            }
        );
        assert!(display
            .get_output()
            .contains(&format!("**Prompt:** {}", prompts::ENTERPRISE_QUESTION)));
    }
}

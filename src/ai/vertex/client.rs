use crate::models::Config;
use crate::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Lightweight Vertex AI REST client for publisher-model endpoints.
pub struct VertexHttpClient {
    client: Client,
    access_token: String,
    project_id: String,
    location: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl VertexHttpClient {
    /// Construct a client from explicit configuration.
    ///
    /// The model should be a bare model ID (for example `gemini-2.0-flash`);
    /// a `models/` prefix is stripped.
    pub fn new(config: &Config) -> Self {
        Self::new_with_client(config, Client::new())
    }

    pub fn new_with_client(config: &Config, client: Client) -> Self {
        let model = config
            .model
            .strip_prefix("models/")
            .unwrap_or(&config.model)
            .to_string();

        Self {
            client,
            access_token: config.access_token.clone(),
            project_id: config.project_id.clone(),
            location: config.location.clone(),
            model,
            base_url: config.endpoint(),
            timeout: config.timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn model_url(&self, method: &str) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:{}",
            self.base_url, self.project_id, self.location, self.model, method
        )
    }

    async fn post_to_url<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        url: String,
        request: &Req,
    ) -> Result<Resp> {
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .bearer_auth(&self.access_token)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Vertex AI: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Vertex AI error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(format!(
                "Vertex AI error (status {}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Vertex AI response: {}\nBody: {}", e, body);
            e
        })?;
        Ok(parsed)
    }

    /// Calls the model's `generateContent` method.
    pub async fn generate_content<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        request: &Req,
    ) -> Result<Resp> {
        self.post_to_url(self.model_url("generateContent"), request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::vertex::test_support;
    use crate::models::GenerationResponse;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_regional_model_url() {
        let client = VertexHttpClient::new(&test_support::config("gemini-2.0-flash"));

        assert_eq!(
            client.model_url("generateContent"),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/test-project/locations/us-central1/publishers/google/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_strips_models_prefix() {
        let client = VertexHttpClient::new(&test_support::config("models/gemini-2.5-pro"));
        assert_eq!(client.model(), "gemini-2.5-pro");
    }

    #[tokio::test]
    async fn test_sends_bearer_token_to_model_path() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(
                "/v1/projects/test-project/locations/us-central1/publishers/google/models/gemini-2.0-flash:generateContent",
            ))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "hi" }] }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = VertexHttpClient::new(&test_support::config("gemini-2.0-flash"))
            .with_base_url(server.uri());

        let response: GenerationResponse = client
            .generate_content(&serde_json::json!({ "contents": [] }))
            .await
            .unwrap();
        assert_eq!(response.text().as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_error_status_returns_ai_provider_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
            .mount(&server)
            .await;

        let client = VertexHttpClient::new(&test_support::config("gemini-2.0-flash"))
            .with_base_url(server.uri());

        let err = client
            .generate_content::<_, GenerationResponse>(&serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("invalid credentials"));
    }

    #[tokio::test]
    async fn test_malformed_body_returns_serialization_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"candidates\": ["))
            .mount(&server)
            .await;

        let client = VertexHttpClient::new(&test_support::config("gemini-2.0-flash"))
            .with_base_url(server.uri());

        let err = client
            .generate_content::<_, GenerationResponse>(&serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}

use crate::models::Config;
use std::time::Duration;
use wiremock::matchers::{method, path_regex};
use wiremock::MockBuilder;

pub const GENERATE_CONTENT_PATH_REGEX: &str =
    r"^/v1/projects/[^/]+/locations/[^/]+/publishers/google/models/[^/:]+:generateContent$";

pub fn post_path_regex(pattern: &str) -> MockBuilder {
    wiremock::Mock::given(method("POST")).and(path_regex(pattern))
}

pub fn config(model: &str) -> Config {
    Config {
        project_id: "test-project".to_string(),
        location: "us-central1".to_string(),
        access_token: "test-token".to_string(),
        model: model.to_string(),
        api_endpoint: None,
        data_store_id: None,
        data_store_region: "global".to_string(),
        timeout: Duration::from_secs(5),
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub title: String,
    pub byline: String,
    pub excerpt: String,
    pub text: String,
}

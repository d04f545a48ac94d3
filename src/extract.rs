use std::time::Duration;

use dom_smoothie::Readability;
use url::Url;

// ── Constants ────────────────────────────────────────────────────────────────

const USER_AGENT: &str = "article-reader-api/1.0 Mozilla/5.0";

/// Upper bound on fetched page size, applied twice: declared `content-length`
/// values above it are rejected outright, and bodies that turn out longer are
/// silently cut down to it before extraction.
const MAX_BYTES: usize = 3_000_000;

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

const EXCLUDED_HOST_NEEDLE: &str = "wikipedia.org";

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Invalid URL")]
    InvalidUrl,
    #[error("Wikipedia sources are excluded")]
    PolicyExcluded,
    #[error("Fetch failed: {0}")]
    FetchFailed(u16),
    #[error("Content too large")]
    ContentTooLarge,
    #[error("Unable to extract readable text")]
    ExtractionFailed,
    #[error("Fetch timeout")]
    FetchTimeout,
    #[error("{0}")]
    Unexpected(String),
}

impl ExtractionError {
    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ExtractionError::FetchTimeout
        } else {
            ExtractionError::Unexpected(e.to_string())
        }
    }
}

// ── Public result type ───────────────────────────────────────────────────────

#[derive(Debug)]
pub struct ExtractResult {
    pub title: String,
    pub byline: String,
    pub excerpt: String,
    pub text: String,
}

// ── Public API ───────────────────────────────────────────────────────────────

pub async fn extract_article(url: &str) -> Result<ExtractResult, ExtractionError> {
    let url = validate_url(url)?;
    let html = fetch_html(&url, FETCH_TIMEOUT).await?;
    extract_from_html(&html, &url)
}

// ── URL validation ───────────────────────────────────────────────────────────

fn validate_url(raw: &str) -> Result<Url, ExtractionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::InvalidUrl);
    }
    let parsed = Url::parse(trimmed).map_err(|_| ExtractionError::InvalidUrl)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ExtractionError::InvalidUrl);
    }
    let host = parsed.host_str().unwrap_or("").to_lowercase();
    if host.contains(EXCLUDED_HOST_NEEDLE) {
        return Err(ExtractionError::PolicyExcluded);
    }
    Ok(parsed)
}

// ── HTTP fetch ───────────────────────────────────────────────────────────────

/// Fetch the page body as text, bounded by `deadline` over the whole exchange.
/// Dropping the timed-out future cancels the in-flight request.
async fn fetch_html(url: &Url, deadline: Duration) -> Result<String, ExtractionError> {
    let client = reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ExtractionError::Unexpected(e.to_string()))?;

    match tokio::time::timeout(deadline, fetch_body(&client, url)).await {
        Ok(result) => result,
        Err(_) => Err(ExtractionError::FetchTimeout),
    }
}

async fn fetch_body(client: &reqwest::Client, url: &Url) -> Result<String, ExtractionError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(ExtractionError::from_reqwest)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExtractionError::FetchFailed(status.as_u16()));
    }

    // Reject on the declared length before touching the body; an absent or
    // unparsable header falls through to the read-side truncation below.
    let declared = response
        .headers()
        .get(reqwest::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    if declared.is_some_and(|len| len > MAX_BYTES as u64) {
        return Err(ExtractionError::ContentTooLarge);
    }

    let html = response
        .text()
        .await
        .map_err(ExtractionError::from_reqwest)?;

    Ok(truncate_to_limit(html, MAX_BYTES))
}

/// Cut `html` down to at most `limit` bytes, backing off to the nearest char
/// boundary so the result stays valid UTF-8. Under-limit input is untouched.
fn truncate_to_limit(mut html: String, limit: usize) -> String {
    if html.len() > limit {
        let mut end = limit;
        while !html.is_char_boundary(end) {
            end -= 1;
        }
        html.truncate(end);
    }
    html
}

// ── Readability extraction ───────────────────────────────────────────────────

fn extract_from_html(html: &str, url: &Url) -> Result<ExtractResult, ExtractionError> {
    let mut readability = Readability::new(html, Some(url.as_str()), None)
        .map_err(|e| ExtractionError::Unexpected(format!("{e:?}")))?;

    let article = readability
        .parse()
        .map_err(|_| ExtractionError::ExtractionFailed)?;

    let text = article.text_content.to_string();
    if text.is_empty() {
        return Err(ExtractionError::ExtractionFailed);
    }

    Ok(ExtractResult {
        title: article.title.to_string(),
        byline: article.byline.map(|s| s.to_string()).unwrap_or_default(),
        excerpt: article.excerpt.map(|s| s.to_string()).unwrap_or_default(),
        text,
    })
}

// ── Tests ────────────────────────────────────────────────────────────────────

//! Live "try it out" calls against the documented APIs.
//!
//! Responses are passed through untouched: JSON is parsed for display,
//! audio and images are reported by type and size.

use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client, StatusCode, Url};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::error::truncate_body;
use crate::catalog::{self, KeyPlacement};
use crate::config::Config;
use crate::guard::ApiId;

/// HTTP request timeout in seconds.
/// Free-tier hosts can take a while to wake up.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Forecasts are offered for 1 to 7 days.
const MAX_FORECAST_DAYS: u8 = 7;

#[derive(Error, Debug)]
pub enum PlaygroundError {
    #[error("No API key configured for {0}")]
    MissingKey(ApiId),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - check your API key")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl PlaygroundError {
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let truncated = truncate_body(body);
        match status.as_u16() {
            401 => PlaygroundError::Unauthorized,
            403 => PlaygroundError::AccessDenied(truncated),
            404 => PlaygroundError::NotFound(truncated),
            429 => PlaygroundError::RateLimited,
            500..=599 => PlaygroundError::ServerError(truncated),
            _ => PlaygroundError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

/// A body as it came back.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Json(serde_json::Value),
    Binary { content_type: String, len: usize },
    Text(String),
}

impl ApiResponse {
    /// Text for the result pane.
    pub fn display(&self) -> String {
        match self {
            ApiResponse::Json(value) => crate::utils::pretty_json(value),
            ApiResponse::Binary { content_type, len } => {
                format!("<{} bytes of {}>", len, content_type)
            }
            ApiResponse::Text(text) => text.clone(),
        }
    }
}

fn decode_query(query: &str) -> Vec<(String, String)> {
    if query.is_empty() {
        return Vec::new();
    }
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return Vec::new();
    };
    url.set_query(Some(query));
    url.query_pairs()
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect()
}

/// One GET against a documented API. The key is added when sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    pub api: ApiId,
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl ApiCall {
    pub fn new(api: ApiId, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') { path } else { format!("/{}", path) };
        Self {
            api,
            path,
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// Parse user input such as `/forecast?city=Paris&days=2`. Only the first
    /// `?` starts the query; the Quran ayah path keeps its `&lang=` suffix.
    /// Query pairs are form-decoded, so `New%20York` and `New+York` both
    /// become `New York` and are encoded once when sent.
    pub fn parse(api: ApiId, input: &str) -> Self {
        let input = input.trim();
        let (path, query) = match input.split_once('?') {
            Some((path, query)) => (path, query),
            None => (input, ""),
        };
        let mut call = Self::new(api, path);
        call.query = decode_query(query);
        call
    }

    // ===== Quran =====

    pub fn quran_surahs() -> Self {
        Self::new(ApiId::Quran, "/surah")
    }

    pub fn quran_surah(number: u16) -> Self {
        Self::new(ApiId::Quran, format!("/surah/{}", number))
    }

    /// `lang` is `eng`, `arabic` or `urdu`.
    pub fn quran_ayah(surah: u16, verse: u16, lang: &str) -> Self {
        Self::new(ApiId::Quran, format!("/{}:{}&lang={}", surah, verse, lang))
    }

    pub fn quran_audio(reciter: &str, surah: u16, verse: u16) -> Self {
        Self::new(ApiId::Quran, format!("/audio/{}/{}:{}", reciter, surah, verse))
    }

    pub fn quran_reciters() -> Self {
        Self::new(ApiId::Quran, "/reciters")
    }

    pub fn quran_para_image(para: u16, page: u16) -> Self {
        Self::new(ApiId::Quran, format!("/para/{}:{}", para, page))
    }

    pub fn quran_surah_image(surah: u16, page: u16) -> Self {
        Self::new(ApiId::Quran, format!("/surah/{}:{}", surah, page))
    }

    pub fn quran_all() -> Self {
        Self::new(ApiId::Quran, "/")
    }

    // ===== Weather =====

    pub fn weather_current(city: &str) -> Self {
        Self::new(ApiId::Weather, "/current").with_query("city", city)
    }

    /// `days` is clamped to 1..=7.
    pub fn weather_forecast(city: &str, days: u8) -> Self {
        Self::new(ApiId::Weather, "/forecast")
            .with_query("city", city)
            .with_query("days", days.clamp(1, MAX_FORECAST_DAYS))
    }

    // ===== Hadith =====

    pub fn hadith_by_number(edition: &str, number: u32) -> Self {
        Self::new(ApiId::Hadith, format!("/{}/{}", edition, number))
    }

    pub fn hadith_editions() -> Self {
        Self::new(ApiId::Hadith, "/editions")
    }

    pub fn hadith_section(edition: &str, section: u32) -> Self {
        Self::new(ApiId::Hadith, format!("/{}/sections/{}", edition, section))
    }

    pub fn hadith_info() -> Self {
        Self::new(ApiId::Hadith, "/info")
    }

    // ===== Recipe =====

    pub fn recipe_by_name(name: &str) -> Self {
        Self::new(ApiId::Recipe, format!("/name/{}", name))
    }

    pub fn recipe_random() -> Self {
        Self::new(ApiId::Recipe, "/random")
    }

    pub fn recipe_by_id(id: &str) -> Self {
        Self::new(ApiId::Recipe, format!("/{}", id))
    }

    pub fn recipe_categories() -> Self {
        Self::new(ApiId::Recipe, "/categories")
    }

    pub fn recipe_by_category(category: &str) -> Self {
        Self::new(ApiId::Recipe, format!("/category/{}", category))
    }

    pub fn recipe_by_area(area: &str) -> Self {
        Self::new(ApiId::Recipe, format!("/area/{}", area))
    }

    pub fn recipe_by_ingredient(ingredient: &str) -> Self {
        Self::new(ApiId::Recipe, format!("/ingredient/{}", ingredient))
    }

    pub fn recipe_summary(id: &str) -> Self {
        Self::new(ApiId::Recipe, format!("/{}/summary", id))
    }

    pub fn recipe_instructions(id: &str) -> Self {
        Self::new(ApiId::Recipe, format!("/{}/instructions", id))
    }

    // ===== GitHub =====

    pub fn github_activity(username: &str) -> Self {
        Self::new(ApiId::Github, format!("/user/{}", username))
    }
}

/// Client for playground calls.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct PlaygroundClient {
    client: Client,
    config: Config,
}

impl PlaygroundClient {
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, config })
    }

    /// Build the outgoing request with the key applied.
    pub fn prepare(&self, call: &ApiCall) -> Result<reqwest::Request, PlaygroundError> {
        let key = self
            .config
            .key_for(call.api)
            .ok_or(PlaygroundError::MissingKey(call.api))?;

        let base = self.config.base_url(call.api);
        let raw = format!("{}{}", base.trim_end_matches('/'), call.path);
        let mut url = Url::parse(&raw)
            .map_err(|e| PlaygroundError::InvalidRequest(format!("{}: {}", raw, e)))?;
        if !call.query.is_empty() {
            url.query_pairs_mut().extend_pairs(call.query.iter());
        }

        let key_placement = catalog::get(call.api).key;
        if let KeyPlacement::Query(name) = key_placement {
            url.query_pairs_mut().append_pair(name, key);
        }

        let mut request = self.client.get(url).header(header::ACCEPT, "*/*");
        match key_placement {
            KeyPlacement::Header(name) => request = request.header(name, key),
            KeyPlacement::Bearer => request = request.bearer_auth(key),
            KeyPlacement::Query(_) => {}
        }
        Ok(request.build()?)
    }

    pub async fn send(&self, call: &ApiCall) -> Result<ApiResponse, PlaygroundError> {
        let request = self.prepare(call)?;
        debug!(api = %call.api, path = %call.path, "Sending playground request");

        let response = self.client.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(api = %call.api, %status, "Playground request failed");
            return Err(PlaygroundError::from_status(status, &body));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if is_binary(&content_type) {
            let bytes = response.bytes().await?;
            return Ok(ApiResponse::Binary {
                content_type,
                len: bytes.len(),
            });
        }

        let text = response.text().await?;
        Ok(parse_body(&content_type, text))
    }
}

fn is_binary(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or("").trim();
    mime.starts_with("audio/")
        || mime.starts_with("image/")
        || mime.starts_with("video/")
        || mime == "application/octet-stream"
}

/// JSON when it parses as JSON, text otherwise. Some hosts omit or mislabel
/// the content type, so the body decides.
fn parse_body(content_type: &str, text: String) -> ApiResponse {
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(value) => ApiResponse::Json(value),
        Err(e) => {
            if content_type.contains("json") {
                debug!(error = %e, "Body labelled JSON did not parse");
            }
            ApiResponse::Text(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_key() -> PlaygroundClient {
        let mut config = Config::default();
        config.api_key = Some("k3y".to_string());
        PlaygroundClient::new(config).unwrap()
    }

    #[test]
    fn test_missing_key_is_rejected_before_io() {
        let client = PlaygroundClient::new(Config::default()).unwrap();
        let err = client.prepare(&ApiCall::quran_surahs()).unwrap_err();
        assert!(matches!(err, PlaygroundError::MissingKey(ApiId::Quran)));
    }

    #[test]
    fn test_header_key() {
        let request = client_with_key().prepare(&ApiCall::quran_surah(1)).unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://quran-api-ny11.onrender.com/api/v2/quran/surah/1"
        );
        assert_eq!(request.headers()["x-api-key"], "k3y");
    }

    #[test]
    fn test_query_key_after_params() {
        let request = client_with_key()
            .prepare(&ApiCall::weather_forecast("Cairo", 3))
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://weather-api-7qxy.onrender.com/api/v2/forecast?city=Cairo&days=3&key=k3y"
        );
    }

    #[test]
    fn test_bearer_key() {
        let request = client_with_key().prepare(&ApiCall::github_activity("octocat")).unwrap();
        assert_eq!(request.headers()[header::AUTHORIZATION], "Bearer k3y");
        assert!(request.url().as_str().ends_with("/api/v1/github/user/octocat"));
    }

    #[test]
    fn test_base_url_override() {
        let mut config = Config::default();
        config.api_key = Some("k".to_string());
        config.base_urls.insert(ApiId::Recipe, "http://localhost:9000/".to_string());
        let client = PlaygroundClient::new(config).unwrap();
        let request = client.prepare(&ApiCall::recipe_random()).unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:9000/random?key=k");
    }

    #[test]
    fn test_forecast_days_clamped() {
        assert_eq!(ApiCall::weather_forecast("Oslo", 0).query[1].1, "1");
        assert_eq!(ApiCall::weather_forecast("Oslo", 30).query[1].1, "7");
        assert_eq!(ApiCall::weather_forecast("Oslo", 5).query[1].1, "5");
    }

    #[test]
    fn test_parse_user_input() {
        let call = ApiCall::parse(ApiId::Weather, " /forecast?city=Paris&days=2 ");
        assert_eq!(call.path, "/forecast");
        assert_eq!(
            call.query,
            vec![("city".to_string(), "Paris".to_string()), ("days".to_string(), "2".to_string())]
        );

        let ayah = ApiCall::parse(ApiId::Quran, "1:1&lang=eng");
        assert_eq!(ayah, ApiCall::quran_ayah(1, 1, "eng"));
        assert!(ayah.query.is_empty());
    }

    #[test]
    fn test_parsed_query_is_encoded_once() {
        let call = ApiCall::parse(ApiId::Weather, "/current?city=New%20York");
        assert_eq!(call.query, vec![("city".to_string(), "New York".to_string())]);
        assert_eq!(ApiCall::parse(ApiId::Weather, "/current?city=New+York"), call);

        let request = client_with_key().prepare(&call).unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://weather-api-7qxy.onrender.com/api/v2/current?city=New+York&key=k3y"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            PlaygroundError::from_status(StatusCode::UNAUTHORIZED, ""),
            PlaygroundError::Unauthorized
        ));
        assert!(matches!(
            PlaygroundError::from_status(StatusCode::NOT_FOUND, "no such surah"),
            PlaygroundError::NotFound(ref m) if m == "no such surah"
        ));
        assert!(matches!(
            PlaygroundError::from_status(StatusCode::BAD_GATEWAY, ""),
            PlaygroundError::ServerError(_)
        ));
        assert!(matches!(
            PlaygroundError::from_status(StatusCode::IM_A_TEAPOT, "short and stout"),
            PlaygroundError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_body_classification() {
        assert!(is_binary("audio/mpeg"));
        assert!(is_binary("image/png; charset=binary"));
        assert!(!is_binary("application/json; charset=utf-8"));

        assert_eq!(
            parse_body("text/html", r#"{"ok":true}"#.to_string()),
            ApiResponse::Json(serde_json::json!({"ok": true}))
        );
        assert_eq!(
            parse_body("application/json", "not json".to_string()),
            ApiResponse::Text("not json".to_string())
        );
    }

    #[test]
    fn test_binary_display() {
        let response = ApiResponse::Binary {
            content_type: "audio/mpeg".to_string(),
            len: 2048,
        };
        assert_eq!(response.display(), "<2048 bytes of audio/mpeg>");
    }
}

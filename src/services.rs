//! HTTP clients for the translation and emotion services
//!
//! Both services live behind the same base URL and authorize with a raw API
//! key in the `Authorization` header. No retries: failures are reported to the
//! caller, which decides what to do with the post.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::ServicesConfig;
use crate::errors::Result;
use crate::errors::SentimentError;

/// Translates text between two language codes
#[allow(async_fn_in_trait)]
pub trait Translator {
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String>;
}

/// Returns the emotion analysis of a text, as reported by the service
#[allow(async_fn_in_trait)]
pub trait EmotionClassifier {
    async fn get_emotion(&self, text: &str) -> Result<String>;
}

impl<T: Translator> Translator for Arc<T> {
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String> {
        self.as_ref().translate(text, from, to).await
    }
}

impl<C: EmotionClassifier> EmotionClassifier for Arc<C> {
    async fn get_emotion(&self, text: &str) -> Result<String> {
        self.as_ref().get_emotion(text).await
    }
}

#[derive(Serialize)]
struct LanguagePair<'a> {
    from: &'a str,
    to: &'a str,
}

#[derive(Serialize)]
struct TranslationRequest<'a> {
    text: &'a str,
    language: LanguagePair<'a>,
}

#[derive(Deserialize)]
struct TranslationResponse {
    translation: serde_json::Value,
}

#[derive(Serialize)]
struct EmotionRequest<'a> {
    text: &'a str,
}

/// Client for the translator and emotion endpoints
pub struct ServiceClient {
    client: Client,
    base: Url,
    translator: String,
    translator_api_key: String,
    ml_tool: String,
    ml_tool_api_key: String,
}

impl ServiceClient {
    /// Create a new service client
    ///
    /// # Errors
    /// - invalid base URL in configuration
    /// - HTTP client build errors
    pub fn new(config: &ServicesConfig) -> Result<Self> {
        // Url::join replaces the last segment unless the base ends with '/'
        let mut host = config.host.clone();
        if !host.ends_with('/') {
            host.push('/');
        }
        let base = Url::parse(&host)
            .map_err(|e| SentimentError::ConfigError(format!("services.host {host:?}: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SentimentError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            base,
            translator: config.translator.clone(),
            translator_api_key: config.translator_api_key.clone(),
            ml_tool: config.ml_tool.clone(),
            ml_tool_api_key: config.ml_tool_api_key.clone(),
        })
    }

    /// `{host}/translator?translator={translator}`
    pub fn translator_url(&self) -> Result<Url> {
        self.endpoint("translator", "translator", &self.translator)
    }

    /// `{host}/emotion?tool={ml_tool}`
    pub fn emotion_url(&self) -> Result<Url> {
        self.endpoint("emotion", "tool", &self.ml_tool)
    }

    fn endpoint(&self, path: &str, param: &str, value: &str) -> Result<Url> {
        let mut url = self
            .base
            .join(path)
            .map_err(|e| SentimentError::ConfigError(e.to_string()))?;
        url.query_pairs_mut().append_pair(param, value);
        Ok(url)
    }
}

impl Translator for ServiceClient {
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String> {
        let url = self.translator_url()?;
        debug!("Translating {} chars {from} -> {to} via {url}", text.len());

        let request = TranslationRequest {
            text,
            language: LanguagePair { from, to },
        };

        let response = self
            .client
            .post(url)
            .header("Authorization", &self.translator_api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| SentimentError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SentimentError::TranslationError(format!(
                "translator API error ({status}): {error_text}"
            )));
        }

        let result: TranslationResponse = response.json().await.map_err(|e| {
            SentimentError::TranslationError(format!("Failed to parse response: {e}"))
        })?;

        Ok(match result.translation {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        })
    }
}

impl EmotionClassifier for ServiceClient {
    async fn get_emotion(&self, text: &str) -> Result<String> {
        let url = self.emotion_url()?;
        debug!("Requesting emotions for {} chars via {url}", text.len());

        let response = self
            .client
            .post(url)
            .header("Authorization", &self.ml_tool_api_key)
            .json(&EmotionRequest { text })
            .send()
            .await
            .map_err(|e| SentimentError::HttpError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SentimentError::HttpError(e.to_string()))?;

        if !status.is_success() {
            return Err(SentimentError::ClassificationError(format!(
                "emotion API error ({status}): {body}"
            )));
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn client_for(host: &str) -> ServiceClient {
        let mut config = AppConfig::default().services;
        config.host = host.to_string();
        config.translator = "deepl".to_string();
        config.ml_tool = "robertuito".to_string();
        ServiceClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let client = client_for("http://localhost:8080/api");
        assert_eq!(
            client.translator_url().unwrap().as_str(),
            "http://localhost:8080/api/translator?translator=deepl"
        );
        assert_eq!(
            client.emotion_url().unwrap().as_str(),
            "http://localhost:8080/api/emotion?tool=robertuito"
        );
    }

    #[test]
    fn test_endpoint_urls_with_trailing_slash() {
        let client = client_for("http://10.0.0.5:8080/api/");
        assert_eq!(
            client.emotion_url().unwrap().as_str(),
            "http://10.0.0.5:8080/api/emotion?tool=robertuito"
        );
    }

    #[test]
    fn test_invalid_host() {
        let mut config = AppConfig::default().services;
        config.host = "not a url".to_string();
        assert!(matches!(
            ServiceClient::new(&config),
            Err(SentimentError::ConfigError(_))
        ));
    }

    #[test]
    fn test_translation_request_shape() {
        let request = TranslationRequest {
            text: "hello",
            language: LanguagePair { from: "en", to: "es" },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"text": "hello", "language": {"from": "en", "to": "es"}})
        );
    }

    #[tokio::test]
    #[ignore = "Requires a running translator service"]
    async fn test_live_translation() {
        let client = client_for("http://localhost:8080/api");
        let translated = client.translate("good morning", "en", "es").await.unwrap();
        assert!(!translated.is_empty());
    }
}

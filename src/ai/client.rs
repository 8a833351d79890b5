//! HTTP client for hosted text-enhancement models
//!
//! A parameter-mapping shim in front of a hosted inference endpoint: it
//! builds the prompt and generation parameters for each enhancement kind and
//! forwards the call. No model serving, batching, or scheduling of its own.
//! Responses are cached for a TTL and calls are capped by a sliding-window
//! limiter so a button-mashing user doesn't burn the inference quota.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::config::AiSettings;
use crate::util::{SlidingWindowLimiter, TtlCache};

use super::{AiError, Enhancement, EnhanceKind, TextEnhancer};

/// Request body for the inference endpoint
#[derive(Debug, Serialize)]
struct InferenceRequest {
    inputs: String,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    temperature: f32,
    max_new_tokens: u32,
    return_full_text: bool,
}

/// One candidate in the inference response
#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

impl EnhanceKind {
    /// Prompt template for this enhancement kind
    fn prompt(&self, text: &str) -> String {
        match self {
            EnhanceKind::Bio => format!(
                "Rewrite the following professional bio to be engaging and confident, \
                 in first person, at most 120 words:\n\n{text}"
            ),
            EnhanceKind::Tagline => format!(
                "Rewrite the following tagline to be short and memorable, \
                 at most 12 words:\n\n{text}"
            ),
            EnhanceKind::ProjectDescription => format!(
                "Rewrite the following project description to highlight impact and \
                 technology choices, at most 80 words:\n\n{text}"
            ),
            EnhanceKind::ExperienceSummary => format!(
                "Rewrite the following work experience summary with strong action \
                 verbs and concrete outcomes, at most 80 words:\n\n{text}"
            ),
        }
    }

    /// Generation parameters per kind: taglines want low temperature and few
    /// tokens, bios get more room
    fn parameters(&self) -> GenerationParameters {
        match self {
            EnhanceKind::Bio => GenerationParameters {
                temperature: 0.8,
                max_new_tokens: 220,
                return_full_text: false,
            },
            EnhanceKind::Tagline => GenerationParameters {
                temperature: 0.5,
                max_new_tokens: 40,
                return_full_text: false,
            },
            EnhanceKind::ProjectDescription | EnhanceKind::ExperienceSummary => {
                GenerationParameters {
                    temperature: 0.7,
                    max_new_tokens: 160,
                    return_full_text: false,
                }
            }
        }
    }
}

/// Enhancement client backed by a HuggingFace-hosted inference endpoint
pub struct HfTextEnhancer {
    http: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
    model_label: String,
    cache: Mutex<TtlCache<String, Enhancement>>,
    limiter: Mutex<SlidingWindowLimiter>,
}

impl HfTextEnhancer {
    pub fn new(settings: &AiSettings) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let model_label = settings
            .endpoint
            .rsplit('/')
            .next()
            .unwrap_or("unknown")
            .to_string();

        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            api_token: settings.api_token.clone(),
            model_label,
            cache: Mutex::new(TtlCache::new(
                Duration::from_secs(settings.cache_ttl_secs),
                settings.cache_capacity,
            )),
            limiter: Mutex::new(SlidingWindowLimiter::new(
                settings.rate_limit_requests,
                Duration::from_secs(settings.rate_limit_window_secs),
            )),
        })
    }

    fn cache_key(kind: EnhanceKind, text: &str) -> String {
        format!("{}:{}", kind.as_str(), text)
    }

    fn parse_response(body: &str, model: &str) -> Result<Enhancement, AiError> {
        let candidates: Vec<GeneratedText> =
            serde_json::from_str(body).map_err(|e| AiError::Serde(e.to_string()))?;
        let text = candidates
            .into_iter()
            .next()
            .map(|c| c.generated_text.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AiError::Serde("empty generation".to_string()))?;
        Ok(Enhancement {
            text,
            model: model.to_string(),
            cached: false,
        })
    }
}

#[async_trait]
impl TextEnhancer for HfTextEnhancer {
    async fn enhance(&self, kind: EnhanceKind, text: &str) -> Result<Enhancement, AiError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AiError::EmptyInput);
        }

        let key = Self::cache_key(kind, text);
        if let Some(mut hit) = self.cache.lock().get(&key) {
            tracing::debug!(kind = kind.as_str(), "enhancement served from cache");
            hit.cached = true;
            return Ok(hit);
        }

        if !self.limiter.lock().try_acquire() {
            return Err(AiError::RateLimited);
        }

        let request = InferenceRequest {
            inputs: kind.prompt(text),
            parameters: kind.parameters(),
        };
        let mut builder = self.http.post(&self.endpoint).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                AiError::Timeout
            } else {
                AiError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        match status {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AiError::InvalidApiKey)
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(AiError::RateLimited),
            _ => {
                return Err(AiError::Http {
                    status: status.as_u16(),
                    body,
                })
            }
        }

        let enhancement = Self::parse_response(&body, &self.model_label)?;
        self.cache.lock().insert(key, enhancement.clone());
        Ok(enhancement)
    }
}

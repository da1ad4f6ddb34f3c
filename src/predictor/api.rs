//! Remote predictor backend.
//!
//! `ApiPredictor` posts a whole batch to a phonemization service and maps the
//! answer back by position.  All connection details come from
//! [`PredictorConfig`]; nothing is hardcoded.
//!
//! Wire format:
//!
//! ```text
//! POST {base_url}/v1/phonemize
//! { "model": "...", "lang": "de", "words": ["Sahne", "Eis"] }
//!
//! 200 OK
//! { "predictions": [ { "phonemes": "ˈzaːnə", "tokens": [...], "probabilities": [...] }, ... ] }
//! ```

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::PredictorConfig;
use crate::predictor::backend::{Prediction, Predictor, PredictorError};

#[derive(Debug, Deserialize)]
struct ApiResponse {
    predictions: Vec<Prediction>,
}

/// Parse a service response and check it answers every word.
pub(crate) fn parse_predictions(
    json: serde_json::Value,
    expected: usize,
) -> Result<Vec<Prediction>, PredictorError> {
    let response: ApiResponse =
        serde_json::from_value(json).map_err(|e| PredictorError::Parse(e.to_string()))?;
    if response.predictions.len() != expected {
        return Err(PredictorError::CountMismatch {
            expected,
            got: response.predictions.len(),
        });
    }
    Ok(response.predictions)
}

// ---------------------------------------------------------------------------
// ApiPredictor
// ---------------------------------------------------------------------------

pub struct ApiPredictor {
    client: reqwest::Client,
    config: PredictorConfig,
}

impl ApiPredictor {
    /// Build an `ApiPredictor` with the per-request timeout from
    /// `config.timeout_secs`.
    pub fn from_config(config: &PredictorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/phonemize", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Predictor for ApiPredictor {
    /// The `Authorization: Bearer …` header is attached only when
    /// `config.api_key` is a non-empty string.
    async fn predict_batch(
        &self,
        words: &[String],
        lang: &str,
    ) -> Result<Vec<Prediction>, PredictorError> {
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let body = serde_json::json!({
            "model": self.config.model,
            "lang":  lang,
            "words": words,
        });

        let mut req = self.client.post(self.endpoint()).json(&body);
        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        log::debug!("predictor: sending {} words to {}", words.len(), self.endpoint());
        let response = req.send().await?.error_for_status()?;
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| PredictorError::Parse(e.to_string()))?;

        parse_predictions(json, words.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Core `Predictor` trait, prediction result type and errors.
//!
//! [`Predictor`] is the narrow contract between the resolution pipeline and
//! whatever produces phonemes for words the dictionary does not know — a
//! trained sequence model, a remote service, a cache in front of either.
//!
//! [`MockPredictor`] (available under `#[cfg(test)]`) records every batch it
//! receives so pipeline tests can count predictor traffic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// PredictorError
// ---------------------------------------------------------------------------

/// Errors that can occur while predicting phonemes.
#[derive(Debug, Clone, Error)]
pub enum PredictorError {
    /// HTTP transport or connection error.
    #[error("prediction request failed: {0}")]
    Request(String),

    /// The backend did not answer within the configured timeout.
    #[error("prediction request timed out")]
    Timeout,

    /// The backend response could not be parsed.
    #[error("failed to parse predictor response: {0}")]
    Parse(String),

    /// The backend returned a different number of results than words sent.
    #[error("predictor returned {got} results for {expected} words")]
    CountMismatch { expected: usize, got: usize },

    /// The tokenizer has no start token for the requested language.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Model inference failed.
    #[error("model inference failed: {0}")]
    Model(String),
}

impl From<reqwest::Error> for PredictorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PredictorError::Timeout
        } else {
            PredictorError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// Phonemes predicted for one word, plus optional per-token detail.
///
/// `tokens` and `probabilities` are passed through from the backend as-is;
/// either may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub phonemes: String,
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default)]
    pub probabilities: Vec<f32>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl Prediction {
    /// A prediction carrying only a phoneme string.
    pub fn from_phonemes(phonemes: impl Into<String>) -> Self {
        Self {
            phonemes: phonemes.into(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Predictor trait
// ---------------------------------------------------------------------------

/// Async trait for grapheme-to-phoneme backends.
///
/// Implementors must be `Send + Sync` so they can be shared behind an
/// `Arc<dyn Predictor>`.
///
/// # Contract
///
/// - `predict_batch` returns exactly one [`Prediction`] per input word, in
///   input order.
/// - A word that tokenizes to nothing the backend understands yields an
///   empty phoneme string, not an error.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict_batch(
        &self,
        words: &[String],
        lang: &str,
    ) -> Result<Vec<Prediction>, PredictorError>;

    /// Predict a single word.
    async fn predict(&self, word: &str, lang: &str) -> Result<Prediction, PredictorError> {
        let mut predictions = self.predict_batch(&[word.to_string()], lang).await?;
        if predictions.len() != 1 {
            return Err(PredictorError::CountMismatch {
                expected: 1,
                got: predictions.len(),
            });
        }
        Ok(predictions.remove(0))
    }
}

// Compile-time assertion: Box<dyn Predictor> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Predictor>) {}
};

// ---------------------------------------------------------------------------
// MockPredictor  (test only)
// ---------------------------------------------------------------------------

/// A test double that "predicts" `[word]` (lower-cased) and records every
/// batch it receives.
///
/// ```rust,ignore
/// let predictor = MockPredictor::new();
/// let out = predictor.predict_batch(&["Eis".into()], "de").await.unwrap();
/// assert_eq!(out[0].phonemes, "[eis]");
/// assert_eq!(predictor.call_count(), 1);
/// ```
#[cfg(test)]
pub struct MockPredictor {
    failure: Option<PredictorError>,
    overrides: std::collections::HashMap<String, Prediction>,
    calls: std::sync::Mutex<Vec<Vec<String>>>,
}

#[cfg(test)]
impl MockPredictor {
    pub fn new() -> Self {
        Self {
            failure: None,
            overrides: std::collections::HashMap::new(),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// A mock whose every call fails with `error`.
    pub fn failing(error: PredictorError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new()
        }
    }

    /// Return `prediction` for `word` instead of the default rule.
    pub fn with_prediction(mut self, word: &str, prediction: Prediction) -> Self {
        self.overrides.insert(word.to_string(), prediction);
        self
    }

    /// Every batch received, in call order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All words received across all calls.
    pub fn submitted(&self) -> Vec<String> {
        self.calls().into_iter().flatten().collect()
    }
}

#[cfg(test)]
#[async_trait]
impl Predictor for MockPredictor {
    async fn predict_batch(
        &self,
        words: &[String],
        _lang: &str,
    ) -> Result<Vec<Prediction>, PredictorError> {
        self.calls.lock().unwrap().push(words.to_vec());
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(words
            .iter()
            .map(|w| {
                self.overrides
                    .get(w)
                    .cloned()
                    .unwrap_or_else(|| Prediction::from_phonemes(format!("[{}]", w.to_lowercase())))
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

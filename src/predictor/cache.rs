//! Caching predictor — wraps any [`Predictor`] and memoises its results.
//!
//! Results are keyed by `(lang, word)` and kept for the lifetime of the
//! wrapper, so repeated calls across many texts only send unseen words to
//! the inner backend.  Each call still issues at most one inner batch.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::predictor::backend::{Prediction, Predictor, PredictorError};

pub struct CachingPredictor<P: Predictor> {
    inner: P,
    cache: Mutex<HashMap<(String, String), Prediction>>,
}

impl<P: Predictor> CachingPredictor<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Number of cached predictions.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), Prediction>> {
        // Entries are inserted whole, so a poisoned map is still consistent.
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl<P: Predictor> Predictor for CachingPredictor<P> {
    async fn predict_batch(
        &self,
        words: &[String],
        lang: &str,
    ) -> Result<Vec<Prediction>, PredictorError> {
        let misses: Vec<String> = {
            let cache = self.lock();
            let mut misses: Vec<String> = Vec::new();
            for word in words {
                if !cache.contains_key(&(lang.to_string(), word.clone())) && !misses.contains(word)
                {
                    misses.push(word.clone());
                }
            }
            misses
        };

        if !misses.is_empty() {
            log::debug!(
                "predictor cache: {} of {} words missed",
                misses.len(),
                words.len()
            );
            let predictions = self.inner.predict_batch(&misses, lang).await?;
            if predictions.len() != misses.len() {
                return Err(PredictorError::CountMismatch {
                    expected: misses.len(),
                    got: predictions.len(),
                });
            }
            let mut cache = self.lock();
            for (word, prediction) in misses.into_iter().zip(predictions) {
                cache.insert((lang.to_string(), word), prediction);
            }
        }

        let cache = self.lock();
        words
            .iter()
            .map(|word| {
                cache
                    .get(&(lang.to_string(), word.clone()))
                    .cloned()
                    .ok_or_else(|| PredictorError::Model(format!("cache lost entry for {word:?}")))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Model-backed predictor.
//!
//! [`ModelPredictor`] adapts any [`SequenceModel`] (a trained
//! grapheme → phoneme transformer, loaded elsewhere) to the [`Predictor`]
//! trait:
//!
//! ```text
//! word ──encode──▶ grapheme ids ──(empty after decode? → "")
//!                       │
//!                       ▼
//!            SequenceModel::generate   (blocking, thread pool)
//!                       │
//!                       ▼
//!        phoneme ids + scores ──decode──▶ Prediction
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::predictor::backend::{Prediction, Predictor, PredictorError};
use crate::predictor::tokenizer::SequenceTokenizer;

// ---------------------------------------------------------------------------
// SequenceModel
// ---------------------------------------------------------------------------

/// Output of one model run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    /// Phoneme token ids, possibly including start/end tokens.
    pub ids: Vec<usize>,
    /// Per-id probability; empty when the model does not report them.
    pub probabilities: Vec<f32>,
}

/// Blocking sequence-to-sequence inference.
pub trait SequenceModel: Send + Sync {
    fn generate(&self, input: &[usize], lang: &str) -> Result<Generation, PredictorError>;
}

// ---------------------------------------------------------------------------
// ModelPredictor
// ---------------------------------------------------------------------------

pub struct ModelPredictor {
    model: Arc<dyn SequenceModel>,
    text_tokenizer: Arc<SequenceTokenizer>,
    phoneme_tokenizer: Arc<SequenceTokenizer>,
}

impl ModelPredictor {
    pub fn new(
        model: Arc<dyn SequenceModel>,
        text_tokenizer: SequenceTokenizer,
        phoneme_tokenizer: SequenceTokenizer,
    ) -> Self {
        Self {
            model,
            text_tokenizer: Arc::new(text_tokenizer),
            phoneme_tokenizer: Arc::new(phoneme_tokenizer),
        }
    }

    /// Predict one word on the current thread.
    pub fn predict_word(&self, word: &str, lang: &str) -> Result<Prediction, PredictorError> {
        predict_word(
            self.model.as_ref(),
            &self.text_tokenizer,
            &self.phoneme_tokenizer,
            word,
            lang,
        )
    }
}

fn predict_word(
    model: &dyn SequenceModel,
    text_tokenizer: &SequenceTokenizer,
    phoneme_tokenizer: &SequenceTokenizer,
    word: &str,
    lang: &str,
) -> Result<Prediction, PredictorError> {
    let input = text_tokenizer.encode_text(word, lang)?;
    if text_tokenizer.decode(&input, true).is_empty() {
        log::debug!("predictor: {word:?} has no known graphemes, skipping model");
        return Ok(Prediction::default());
    }

    let generation = model.generate(&input, lang)?;
    let (tokens, probabilities) =
        phoneme_tokenizer.decode_scored(&generation.ids, &generation.probabilities, true);
    let confidence = if probabilities.is_empty() {
        None
    } else {
        Some(probabilities.iter().product())
    };

    Ok(Prediction {
        phonemes: tokens.concat(),
        tokens,
        probabilities,
        confidence,
    })
}

#[async_trait]
impl Predictor for ModelPredictor {
    /// Run the whole batch on the blocking thread pool.
    async fn predict_batch(
        &self,
        words: &[String],
        lang: &str,
    ) -> Result<Vec<Prediction>, PredictorError> {
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let text_tokenizer = Arc::clone(&self.text_tokenizer);
        let phoneme_tokenizer = Arc::clone(&self.phoneme_tokenizer);
        let words = words.to_vec();
        let lang = lang.to_string();

        tokio::task::spawn_blocking(move || {
            words
                .iter()
                .map(|w| {
                    predict_word(
                        model.as_ref(),
                        &text_tokenizer,
                        &phoneme_tokenizer,
                        w,
                        &lang,
                    )
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(|e| PredictorError::Model(format!("inference task failed: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

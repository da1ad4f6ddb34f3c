//! Prediction batching.
//!
//! [`PredictionBatcher`] gathers every string still pending in a
//! [`ResolutionTable`], sends them to the [`Predictor`] as one ordered batch,
//! and writes the results back.  Empty strings resolve to `""` without a
//! predictor call, and nothing containing a hyphen is ever submitted.
//! Deferred words with affixes are completed from their core's prediction.

use std::collections::HashMap;

use crate::pipeline::compound::is_compound;
use crate::pipeline::resolution::{ResolutionRecord, ResolutionSource, ResolutionTable};
use crate::pipeline::runner::PhonemizerError;
use crate::predictor::{Prediction, Predictor};

pub struct PredictionBatcher<'a> {
    predictor: &'a dyn Predictor,
}

impl<'a> PredictionBatcher<'a> {
    pub fn new(predictor: &'a dyn Predictor) -> Self {
        Self { predictor }
    }

    /// Resolve all pending entries of `table`.  Returns the raw prediction
    /// for every submitted string.
    pub async fn run(
        &self,
        table: &mut ResolutionTable,
        lang: &str,
    ) -> Result<HashMap<String, Prediction>, PhonemizerError> {
        let pending = table.take_pending();
        let mut batch: Vec<String> = Vec::with_capacity(pending.len());
        for word in pending {
            if word.is_empty() {
                table.insert(&word, ResolutionRecord::empty());
            } else if is_compound(&word) {
                log::warn!("batcher: refusing to predict hyphenated {word:?}");
            } else {
                batch.push(word);
            }
        }

        if batch.is_empty() {
            table.resolve_wrapped();
            return Ok(HashMap::new());
        }

        log::debug!("batcher: predicting {} distinct words", batch.len());
        let predictions = self.predictor.predict_batch(&batch, lang).await?;
        if predictions.len() != batch.len() {
            return Err(PhonemizerError::CountMismatch {
                expected: batch.len(),
                got: predictions.len(),
            });
        }

        let mut details = HashMap::with_capacity(batch.len());
        for (word, prediction) in batch.into_iter().zip(predictions) {
            table.insert(
                &word,
                ResolutionRecord::new(prediction.phonemes.clone(), ResolutionSource::Predicted),
            );
            details.insert(word, prediction);
        }
        table.resolve_wrapped();
        Ok(details)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::{MockPredictor, PredictorError};

    #[tokio::test]
    async fn submits_pending_once_in_order() {
        let predictor = MockPredictor::new();
        let mut table = ResolutionTable::new();
        table.mark_pending("Torte");
        table.mark_pending("Eis");

        let details = PredictionBatcher::new(&predictor)
            .run(&mut table, "de")
            .await
            .unwrap();

        assert_eq!(predictor.calls(), vec![vec!["Torte".to_string(), "Eis".to_string()]]);
        assert_eq!(table.get("Eis").map(|r| r.phonemes.as_str()), Some("[eis]"));
        assert_eq!(details.len(), 2);
        assert!(table.pending().is_empty());
    }

    #[tokio::test]
    async fn affixed_words_share_the_core_prediction() {
        let predictor = MockPredictor::new();
        let mut table = ResolutionTable::new();
        table.defer("\"Eis\"");
        table.defer("Eis!");
        table.defer("Eis");

        let details = PredictionBatcher::new(&predictor)
            .run(&mut table, "de")
            .await
            .unwrap();

        assert_eq!(predictor.submitted(), vec!["Eis".to_string()]);
        assert_eq!(table.get("\"Eis\"").map(|r| r.phonemes.as_str()), Some("\"[eis]\""));
        assert_eq!(table.get("Eis!").map(|r| r.phonemes.as_str()), Some("[eis]!"));
        assert_eq!(
            table.get("Eis!").map(|r| r.source),
            Some(ResolutionSource::Predicted)
        );
        assert!(details.contains_key("Eis"));
    }

    #[tokio::test]
    async fn nothing_pending_means_no_call() {
        let predictor = MockPredictor::new();
        let mut table = ResolutionTable::new();
        table.mark_pending("");

        PredictionBatcher::new(&predictor)
            .run(&mut table, "de")
            .await
            .unwrap();

        assert_eq!(predictor.call_count(), 0);
        assert_eq!(table.get("").map(|r| r.source), Some(ResolutionSource::Empty));
    }

    #[tokio::test]
    async fn hyphenated_strings_are_never_submitted() {
        let predictor = MockPredictor::new();
        let mut table = ResolutionTable::new();
        table.mark_pending("a-b");
        table.mark_pending("c");

        PredictionBatcher::new(&predictor)
            .run(&mut table, "de")
            .await
            .unwrap();

        assert_eq!(predictor.submitted(), vec!["c".to_string()]);
    }

    #[tokio::test]
    async fn predictor_failure_is_propagated() {
        let predictor = MockPredictor::failing(PredictorError::Timeout);
        let mut table = ResolutionTable::new();
        table.mark_pending("Eis");

        let err = PredictionBatcher::new(&predictor)
            .run(&mut table, "de")
            .await
            .unwrap_err();

        assert!(matches!(err, PhonemizerError::Predictor(PredictorError::Timeout)));
        assert!(table.get("Eis").is_none());
    }
}

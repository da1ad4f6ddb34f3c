//! Command-line entry point.
//!
//! ```text
//! phonemizer [--config PATH] [--lang LANG] TEXT...
//! ```
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] (defaults when the file is missing).
//! 3. Load the phonetic dictionary (configured path or `phoneme-dict.json`
//!    in the config directory), if there is one.
//! 4. Build the [`ApiPredictor`] from config.
//! 5. Phonemize all texts as one list and print the results.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use phonemizer::{
    config::AppConfig,
    pipeline::Phonemizer,
    predictor::{ApiPredictor, Predictor},
};

#[derive(Parser, Debug)]
#[command(name = "phonemizer")]
#[command(about = "Convert text to phonemes with a dictionary and a phoneme predictor")]
struct Args {
    /// Settings file (defaults to the per-user config location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Language code; overrides the configured language
    #[arg(long)]
    lang: Option<String>,

    /// Texts to phonemize
    #[arg(required = true)]
    texts: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        }),
    };
    let lang = args.lang.unwrap_or_else(|| config.language.clone());

    let dictionary = config
        .dictionary
        .load()
        .context("failed to load phonetic dictionary")?;
    if dictionary.is_none() {
        log::info!("No phonetic dictionary found; every word goes to the predictor");
    }

    let predictor: Arc<dyn Predictor> = Arc::new(ApiPredictor::from_config(&config.predictor));
    let phonemizer = Phonemizer::from_config(&config.text, dictionary, predictor);

    let result = phonemizer.phonemize_list(args.texts.as_slice(), &lang).await?;

    for (index, (text, phonemes)) in result.text.iter().zip(&result.phonemes).enumerate() {
        let predicted = result.predictions_for(index);
        for (word, prediction) in &predicted {
            log::debug!("{word}: {:?}", prediction.phonemes);
            for (token, prob) in prediction.tokens.iter().zip(&prediction.probabilities) {
                println!("{token} {prob}");
            }
        }
        let confidence = predicted
            .iter()
            .filter_map(|(_, p)| p.confidence)
            .reduce(|a, b| a * b);
        match confidence {
            Some(c) => println!("{text} | {phonemes} | {c:.4}"),
            None => println!("{text} | {phonemes} | -"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn lang_accepts_equals_form() {
        let args = Args::try_parse_from(["phonemizer", "--lang=en_us", "Hallo Welt"]).unwrap();
        assert_eq!(args.lang.as_deref(), Some("en_us"));
        assert_eq!(args.texts, vec!["Hallo Welt".to_string()]);
    }

    #[test]
    fn help_is_not_treated_as_text() {
        let err = Args::try_parse_from(["phonemizer", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn texts_are_required() {
        assert!(Args::try_parse_from(["phonemizer", "--lang", "de"]).is_err());
    }

    #[test]
    fn config_path_and_several_texts() {
        let args =
            Args::try_parse_from(["phonemizer", "--config", "/tmp/p.toml", "Eis", "Torte"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/p.toml")));
        assert_eq!(args.texts.len(), 2);
    }
}

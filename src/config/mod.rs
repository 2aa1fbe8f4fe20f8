//! Paths and the unknown-token marker used by the command line.
//!
//! Load from the environment with [`from_env`], then call [`Config::validate`].

mod builder;
mod constants;
mod error;

use crate::{UNK_TOKEN, split};
use constants::{DEFAULT_CORPUS_PATH, DEFAULT_LOSSY_CORPUS, DEFAULT_VOCAB_PATH};
use std::path::PathBuf;

pub use builder::{env_key, from_env, from_vars};
pub use error::ConfigError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Raw text the vocabulary is built from.
    pub corpus_path: PathBuf,
    /// Where the vocabulary file is read and written.
    pub vocab_path: PathBuf,
    /// Marker substituted for unseen tokens.
    pub unk_token: String,
    /// Decode a non-UTF-8 corpus as Latin-1 instead of failing.
    pub lossy_corpus: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from(DEFAULT_CORPUS_PATH),
            vocab_path: PathBuf::from(DEFAULT_VOCAB_PATH),
            unk_token: UNK_TOKEN.to_string(),
            lossy_corpus: DEFAULT_LOSSY_CORPUS,
        }
    }
}

impl Config {
    /// The marker has to survive splitting as a single token.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unk_token.is_empty() {
            return Err(ConfigError::Validation("unk_token must not be empty".into()));
        }
        if let Some(c) = self.unk_token.chars().find(|&c| split::is_delimiter(c)) {
            return Err(ConfigError::Validation(format!(
                "unk_token {:?} contains delimiter {c:?}",
                self.unk_token
            )));
        }
        if self.unk_token.contains(split::DASH) {
            return Err(ConfigError::Validation(format!(
                "unk_token {:?} contains {:?}",
                self.unk_token,
                split::DASH
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_config {
    use super::*;
    use std::{collections::HashMap, env::VarError, path::Path};

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Result<String, VarError> {
        let map = pairs
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn defaults_when_unset() {
        let config = from_vars(vars(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.unk_token, "<|unk|>");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn variables_override_defaults() {
        let config = from_vars(vars(&[
            ("WORDTOK_CORPUS_PATH", "data/corpus.txt"),
            ("WORDTOK_VOCAB_PATH", "out/vocab.tsv"),
            ("WORDTOK_UNK_TOKEN", "<unk>"),
            ("WORDTOK_LOSSY_CORPUS", "true"),
        ]))
        .unwrap();
        assert_eq!(config.corpus_path, Path::new("data/corpus.txt"));
        assert_eq!(config.vocab_path, Path::new("out/vocab.tsv"));
        assert_eq!(config.unk_token, "<unk>");
        assert!(config.lossy_corpus);
    }

    #[test]
    fn unparsable_flag_is_parse_error() {
        let err = from_vars(vars(&[("WORDTOK_LOSSY_CORPUS", "maybe")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Parse { ref key, ref value, .. }
                if key == "WORDTOK_LOSSY_CORPUS" && value == "maybe"
        ));
    }

    #[test]
    fn non_unicode_is_env_var_error() {
        let err = from_vars(|key| {
            if key == "WORDTOK_VOCAB_PATH" {
                Err(VarError::NotUnicode("\u{fffd}".into()))
            } else {
                Err(VarError::NotPresent)
            }
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref key, .. } if key == "WORDTOK_VOCAB_PATH"));
    }

    #[test]
    fn marker_must_survive_splitting() {
        for bad in ["", "<unk >", "[unk]!", "un--k", "(unk)"] {
            let config = Config {
                unk_token: bad.into(),
                ..Config::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::Validation(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn env_key_uses_prefix() {
        assert_eq!(env_key("VOCAB_PATH"), "WORDTOK_VOCAB_PATH");
    }
}

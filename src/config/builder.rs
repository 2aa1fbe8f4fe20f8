//! Build [`Config`] from `WORDTOK_*` environment variables.

use super::constants::{
    ENV_CORPUS_PATH, ENV_LOSSY_CORPUS, ENV_PREFIX, ENV_UNK_TOKEN, ENV_VOCAB_PATH,
};
use super::{Config, ConfigError};
use std::{env::VarError, path::PathBuf};

/// Full variable name for a suffix (`VOCAB_PATH` → `WORDTOK_VOCAB_PATH`).
#[must_use]
pub fn env_key(suffix: &str) -> String {
    format!("{ENV_PREFIX}{suffix}")
}

/// Reads the process environment. Unset variables keep their defaults.
pub fn from_env() -> Result<Config, ConfigError> {
    from_vars(|key| std::env::var(key))
}

/// Same as [`from_env`] over any variable source.
pub fn from_vars(var: impl Fn(&str) -> Result<String, VarError>) -> Result<Config, ConfigError> {
    let default = Config::default();

    let corpus_path = string(&var, ENV_CORPUS_PATH)?
        .map(PathBuf::from)
        .unwrap_or(default.corpus_path);
    let vocab_path = string(&var, ENV_VOCAB_PATH)?
        .map(PathBuf::from)
        .unwrap_or(default.vocab_path);
    let unk_token = string(&var, ENV_UNK_TOKEN)?.unwrap_or(default.unk_token);
    let lossy_corpus = parsed::<bool>(&var, ENV_LOSSY_CORPUS)?.unwrap_or(default.lossy_corpus);

    Ok(Config {
        corpus_path,
        vocab_path,
        unk_token,
        lossy_corpus,
    })
}

fn string(
    var: &impl Fn(&str) -> Result<String, VarError>,
    suffix: &str,
) -> Result<Option<String>, ConfigError> {
    let key = env_key(suffix);
    match var(&key) {
        Ok(s) => Ok(Some(s)),
        Err(VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar {
            key,
            message: e.to_string(),
        }),
    }
}

fn parsed<T>(
    var: &impl Fn(&str) -> Result<String, VarError>,
    suffix: &str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = string(var, suffix)? else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::Parse {
            key: env_key(suffix),
            message: e.to_string(),
            value,
        })
}

//! Environment variable names and default values.

/// Prefix shared by every variable (e.g. `WORDTOK_VOCAB_PATH`).
pub(crate) const ENV_PREFIX: &str = "WORDTOK_";

pub(crate) const ENV_CORPUS_PATH: &str = "CORPUS_PATH";
pub(crate) const ENV_VOCAB_PATH: &str = "VOCAB_PATH";
pub(crate) const ENV_UNK_TOKEN: &str = "UNK_TOKEN";
pub(crate) const ENV_LOSSY_CORPUS: &str = "LOSSY_CORPUS";

pub(crate) const DEFAULT_CORPUS_PATH: &str = "the-verdict.txt";
pub(crate) const DEFAULT_VOCAB_PATH: &str = "vocabulary.txt";
pub(crate) const DEFAULT_LOSSY_CORPUS: bool = false;

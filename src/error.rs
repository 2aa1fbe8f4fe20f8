use crate::utok;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced by vocabulary construction, persistence and the tokenizer.
#[derive(Debug, Error)]
pub enum Error {
    /// A persisted vocabulary line is not `<token>\t<id>`.
    #[error("malformed vocabulary line {line}: {reason}")]
    Format { line: usize, reason: String },

    /// Two tokens claim the same id.
    #[error("id {id} is assigned to both {first:?} and {second:?}")]
    DuplicateId {
        id: utok,
        first: String,
        second: String,
    },

    /// The same token appears with two ids.
    #[error("token {token:?} is listed with ids {first} and {second}")]
    DuplicateToken {
        token: String,
        first: utok,
        second: utok,
    },

    /// Encode met an out-of-vocabulary token and the unknown marker is not in the vocabulary.
    #[error("token {0:?} is not in the vocabulary and no unknown marker is available")]
    UnknownToken(String),

    /// Decode met an id with no token behind it.
    #[error("id {0} is not assigned to any token")]
    UnknownId(utok),

    /// File content is not valid UTF-8.
    #[error("{} is not valid UTF-8 text", path.display())]
    Encoding { path: PathBuf },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        Self::Format {
            line,
            reason: reason.into(),
        }
    }
}

//! Loading and cleaning raw training text.

use crate::{Error, Result};
use memmap2::Mmap;
use regex::Regex;
use std::{fs::File, path::Path, sync::LazyLock};

/// Reads a UTF-8 text file.
///
/// # Errors
///
/// [`Error::Encoding`] if the content is not valid UTF-8, [`Error::Io`] if the file
/// cannot be opened or mapped.
pub fn load_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let text = with_mapped(path, |bytes| match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_owned()),
        Err(_) => Err(Error::Encoding { path: path.into() }),
    })?;
    describe(&text);
    Ok(text)
}

/// Reads a text file as UTF-8, falling back to Latin-1 when the bytes are not valid UTF-8.
pub fn load_text_lossy(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let text = with_mapped(path, |bytes| {
        Ok(match std::str::from_utf8(bytes) {
            Ok(text) => text.to_owned(),
            Err(e) => {
                log::warn!(
                    "{} is not UTF-8 ({e}), decoding as Latin-1",
                    path.display()
                );
                latin1(bytes)
            }
        })
    })?;
    describe(&text);
    Ok(text)
}

/// Options for [`normalize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Normalize {
    pub lowercase: bool,
    pub remove_punctuation: bool,
}

impl Default for Normalize {
    fn default() -> Self {
        Self {
            lowercase: true,
            remove_punctuation: false,
        }
    }
}

static NOT_WORD_OR_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("static pattern"));

/// Optionally lowercases and strips punctuation, then collapses whitespace runs to a
/// single space and trims the ends.
pub fn normalize(text: &str, opts: &Normalize) -> String {
    let mut text = if opts.lowercase {
        text.to_lowercase()
    } else {
        text.to_owned()
    };
    if opts.remove_punctuation {
        text = NOT_WORD_OR_SPACE.replace_all(&text, "").into_owned();
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Logs the size and opening characters of a loaded text.
pub fn describe(text: &str) {
    if log::log_enabled!(log::Level::Debug) {
        let head = text.chars().take(99).collect::<String>();
        log::debug!("{} characters, starting with {head:?}", text.chars().count());
    }
}

/// Maps `path` into memory and hands its bytes to `f`. Empty files are not mapped.
pub(crate) fn with_mapped<R>(path: &Path, f: impl FnOnce(&[u8]) -> Result<R>) -> Result<R> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let len = file.metadata().map_err(|e| Error::io(path, e))?.len();
    if len == 0 {
        return f(&[]);
    }
    // The mapping is read-only and dropped before this function returns.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| Error::io(path, e))?;
    f(&mmap)
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

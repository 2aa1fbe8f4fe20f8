//! Tab-separated vocabulary files: one `<token>\t<id>` entry per line, UTF-8, no header.

use super::Vocabulary;
use crate::{Error, Result, corpus, utok};
use memchr::memchr;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Writes `vocab` to `path`, one entry per line in ascending id order.
pub fn save(vocab: &Vocabulary, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    write(vocab, &mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| Error::io(path, e))?;
    log::info!("saved {} tokens to {}", vocab.len(), path.display());
    Ok(())
}

/// Writes `vocab` to any writer in the file format.
pub fn write<W: Write>(vocab: &Vocabulary, writer: &mut W) -> std::io::Result<()> {
    for (token, id) in vocab.sorted_by_id() {
        writeln!(writer, "{token}\t{id}")?;
    }
    Ok(())
}

/// Loads a vocabulary file. Any malformed line fails the whole load.
pub fn load(path: impl AsRef<Path>) -> Result<Vocabulary> {
    let path = path.as_ref();
    let vocab = corpus::with_mapped(path, |bytes| {
        let text = std::str::from_utf8(bytes).map_err(|_| Error::Encoding { path: path.into() })?;
        parse(text)
    })?;
    log::info!("loaded {} tokens from {}", vocab.len(), path.display());
    Ok(vocab)
}

/// Parses file content. Line numbers in errors are 1-based.
pub fn parse(text: &str) -> Result<Vocabulary> {
    let pairs = text
        .lines()
        .enumerate()
        .map(|(i, line)| parse_line(i + 1, line))
        .collect::<Result<Vec<_>>>()?;
    Vocabulary::from_pairs(pairs)
}

fn parse_line(n: usize, line: &str) -> Result<(&str, utok)> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let Some(tab) = memchr(b'\t', line.as_bytes()) else {
        return Err(Error::format(n, format!("expected <token>\\t<id>, got {line:?}")));
    };
    let (token, id) = (&line[..tab], &line[tab + 1..]);
    if memchr(b'\t', id.as_bytes()).is_some() {
        return Err(Error::format(n, "more than two fields"));
    }
    if token.is_empty() {
        return Err(Error::format(n, "empty token"));
    }
    let id = id
        .parse::<utok>()
        .map_err(|e| Error::format(n, format!("invalid id {id:?}: {e}")))?;
    Ok((token, id))
}

//! Token ↔ id vocabulary.

pub mod tsv;

use crate::{Error, Result, split, utok};
use std::collections::{BTreeSet, HashMap, hash_map::Entry};

/// Tokens holding ids 0 and 1 in [`Vocabulary::with_min_freq`].
pub const FREQ_SPECIALS: [&str; 2] = ["<pad>", "<unk>"];

/// Immutable mapping from token to id.
///
/// [`Vocabulary::build`] numbers the distinct tokens densely in ascending lexicographic
/// order. Mappings supplied from outside ([`Vocabulary::from_pairs`], [`tsv::load`]) only
/// need unique tokens and unique ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Vocabulary {
    map: HashMap<String, utok>,
}

impl Vocabulary {
    /// Builds a vocabulary from a token sequence. Order and duplicates do not matter;
    /// empty tokens are ignored.
    ///
    /// # Panics
    ///
    /// If there are more distinct tokens than [`utok`] can number.
    pub fn build<T: AsRef<str>>(tokens: impl IntoIterator<Item = T>) -> Self {
        let mut distinct = BTreeSet::new();
        for token in tokens {
            let token = token.as_ref();
            if !token.is_empty() && !distinct.contains(token) {
                distinct.insert(token.to_owned());
            }
        }

        if let (Some(first), Some(last)) = (distinct.first(), distinct.last()) {
            log::debug!(
                "built vocabulary of {} tokens, first {first:?}, last {last:?}",
                distinct.len()
            );
        }

        let map = distinct
            .into_iter()
            .enumerate()
            .map(|(i, token)| (token, dense_id(i)))
            .collect();
        Self { map }
    }

    /// Counts whitespace-separated words over `texts` and keeps those seen at least
    /// `min_freq` times.
    ///
    /// [`FREQ_SPECIALS`] take ids 0 and 1. Kept words follow in order of first appearance.
    /// Words equal to a special token are not counted twice.
    ///
    /// # Panics
    ///
    /// If more words are kept than [`utok`] can number.
    pub fn with_min_freq<T: AsRef<str>>(
        texts: impl IntoIterator<Item = T>,
        min_freq: usize,
    ) -> Result<Self> {
        let mut counts = HashMap::<String, usize>::new();
        let mut first_seen = Vec::new();
        for text in texts {
            for word in text.as_ref().split_whitespace() {
                match counts.get_mut(word) {
                    Some(n) => *n += 1,
                    None => {
                        counts.insert(word.to_owned(), 1);
                        first_seen.push(word.to_owned());
                    }
                }
            }
        }

        let kept = first_seen
            .into_iter()
            .filter(|word| counts[word] >= min_freq && !FREQ_SPECIALS.contains(&word.as_str()));
        let pairs = FREQ_SPECIALS
            .iter()
            .map(|&special| special.to_owned())
            .chain(kept)
            .enumerate()
            .map(|(i, token)| (token, dense_id(i)))
            .collect::<Vec<_>>();
        log::debug!(
            "kept {} of {} distinct words at min_freq {min_freq}",
            pairs.len() - FREQ_SPECIALS.len(),
            counts.len()
        );
        Self::from_pairs(pairs)
    }

    /// Splits `text` and builds a vocabulary from the resulting tokens.
    pub fn from_corpus(text: &str) -> Self {
        Self::build(split::pieces(text))
    }

    /// Rebuilds the vocabulary with `extra` tokens (e.g. [`crate::UNK_TOKEN`]) added.
    ///
    /// All ids are reassigned by the sorting rule of [`Vocabulary::build`].
    #[must_use]
    pub fn with_special<T: AsRef<str>>(&self, extra: impl IntoIterator<Item = T>) -> Self {
        let extra = extra
            .into_iter()
            .map(|t| t.as_ref().to_owned())
            .collect::<Vec<_>>();
        Self::build(self.map.keys().map(String::as_str).chain(extra.iter().map(String::as_str)))
    }

    /// Accepts an externally supplied mapping.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateToken`] or [`Error::DuplicateId`] if the mapping is not a bijection,
    /// and [`Error::Format`] for an empty token or one containing a tab or line break.
    pub fn from_pairs<T: Into<String>>(pairs: impl IntoIterator<Item = (T, utok)>) -> Result<Self> {
        let mut map = HashMap::new();
        let mut owners = HashMap::<utok, String>::new();
        for (i, (token, id)) in pairs.into_iter().enumerate() {
            let token = token.into();
            if token.is_empty() {
                return Err(Error::format(i + 1, "empty token"));
            }
            if token.contains(['\t', '\n', '\r']) {
                return Err(Error::format(
                    i + 1,
                    format!("token {token:?} contains a tab or line break"),
                ));
            }
            match owners.entry(id) {
                Entry::Occupied(owner) => {
                    return Err(if owner.get() == &token {
                        Error::DuplicateToken {
                            token,
                            first: id,
                            second: id,
                        }
                    } else {
                        Error::DuplicateId {
                            id,
                            first: owner.get().clone(),
                            second: token,
                        }
                    });
                }
                Entry::Vacant(owner) => {
                    owner.insert(token.clone());
                }
            }
            match map.entry(token) {
                Entry::Occupied(entry) => {
                    return Err(Error::DuplicateToken {
                        token: entry.key().clone(),
                        first: *entry.get(),
                        second: id,
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(id);
                }
            }
        }
        Ok(Self { map })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[inline]
    pub fn id(&self, token: &str) -> Option<utok> {
        self.map.get(token).copied()
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.map.contains_key(token)
    }

    /// Finds the token for `id` by scanning. Use [`crate::Tokenizer`] for repeated lookups.
    pub fn token(&self, id: utok) -> Option<&str> {
        self.iter().find(|&(_, i)| i == id).map(|(t, _)| t)
    }

    /// Iterates `(token, id)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, utok)> + '_ {
        self.map.iter().map(|(t, &i)| (t.as_str(), i))
    }

    /// `(token, id)` pairs in ascending id order.
    pub fn sorted_by_id(&self) -> Vec<(&str, utok)> {
        let mut pairs = self.iter().collect::<Vec<_>>();
        pairs.sort_unstable_by_key(|&(_, id)| id);
        pairs
    }
}

fn dense_id(i: usize) -> utok {
    utok::try_from(i).expect("more distinct tokens than token ids")
}

impl TryFrom<HashMap<String, utok>> for Vocabulary {
    type Error = Error;

    fn try_from(map: HashMap<String, utok>) -> Result<Self> {
        Self::from_pairs(map)
    }
}

use crate::{Encode, Error, Result, UNK_TOKEN, Vocabulary, split, utok};
use std::collections::HashMap;

/// Word-level tokenizer over a fixed [`Vocabulary`].
///
/// The reverse map is derived once at construction and never changes, so a tokenizer
/// can be shared between threads for concurrent encode/decode.
#[derive(Clone, Debug)]
pub struct Tokenizer {
    vocab: Vocabulary,
    reverse: HashMap<utok, String>,
    unk: Option<utok>,
}

impl Tokenizer {
    /// Wraps `vocab` with [`UNK_TOKEN`] as the unknown marker.
    pub fn new(vocab: Vocabulary) -> Self {
        Self::with_unk_token(vocab, UNK_TOKEN)
    }

    /// Wraps `vocab`, substituting `marker` for unseen tokens when the vocabulary has it.
    pub fn with_unk_token(vocab: Vocabulary, marker: &str) -> Self {
        let reverse = vocab
            .iter()
            .map(|(token, id)| (id, token.to_owned()))
            .collect::<HashMap<_, _>>();
        debug_assert_eq!(reverse.len(), vocab.len());

        let unk = vocab.id(marker);
        if unk.is_none() {
            log::debug!("vocabulary has no {marker} marker, unseen tokens will fail to encode");
        }
        Self {
            vocab,
            reverse,
            unk,
        }
    }

    /// Builds a vocabulary from `text` plus [`UNK_TOKEN`] and wraps it.
    pub fn from_corpus(text: &str) -> Self {
        Self::new(Vocabulary::from_corpus(text).with_special([UNK_TOKEN]))
    }

    /// Splits `text` and maps every token to its id, substituting the unknown marker for
    /// tokens outside the vocabulary.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownToken`] for the first unseen token when the vocabulary has no
    /// unknown marker. Nothing is returned for the tokens before it.
    pub fn encode(&self, text: &str) -> Result<Vec<utok>> {
        split::pieces(text)
            .map(|token| match self.vocab.id(token) {
                Some(id) => Ok(id),
                None => self.unk.ok_or_else(|| Error::UnknownToken(token.into())),
            })
            .collect()
    }

    /// Maps ids back to tokens and joins them into text.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownId`] for the first id that has no token.
    pub fn decode(&self, ids: &[utok]) -> Result<String> {
        self.tokens(ids).map(split::join)
    }

    /// Maps ids to their tokens without joining.
    pub fn tokens(&self, ids: &[utok]) -> Result<Vec<&str>> {
        ids.iter()
            .map(|&id| self.id_to_token(id).ok_or(Error::UnknownId(id)))
            .collect()
    }

    #[inline]
    pub fn id_to_token(&self, id: utok) -> Option<&str> {
        self.reverse.get(&id).map(String::as_str)
    }

    #[inline]
    pub fn token_to_id(&self, token: &str) -> Option<utok> {
        self.vocab.id(token)
    }

    #[inline]
    pub fn unk_id(&self) -> Option<utok> {
        self.unk
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    #[inline]
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }
}

impl From<Vocabulary> for Tokenizer {
    fn from(vocab: Vocabulary) -> Self {
        Self::new(vocab)
    }
}

impl Encode for Tokenizer {
    #[inline]
    fn encode(&self, text: &str) -> Result<Vec<utok>> {
        Tokenizer::encode(self, text)
    }
}

#[cfg(test)]
mod test_tokenizer {
    use super::*;
    use std::sync::Arc;

    fn greeting() -> Tokenizer {
        Tokenizer::new(Vocabulary::build(["hello", "world", ",", "!", UNK_TOKEN]))
    }

    #[test]
    fn hello_world_round_trip() {
        let t = greeting();
        let ids = t.encode("hello, world!").unwrap();
        assert_eq!(ids.len(), 4);
        assert_eq!(t.decode(&ids).unwrap(), "hello, world!");
    }

    #[test]
    fn unseen_word_maps_to_unk() {
        let t = greeting();
        let unk = t.unk_id().unwrap();
        assert_eq!(t.encode("zephyr").unwrap(), [unk]);
        assert_eq!(
            t.encode("hello zephyr!").unwrap(),
            [t.token_to_id("hello").unwrap(), unk, t.token_to_id("!").unwrap()]
        );
        let ids = t.encode("zephyr, world").unwrap();
        assert_eq!(t.decode(&ids).unwrap(), "<|unk|>, world");
    }

    #[test]
    fn one_id_per_joined_token() {
        let t = greeting();
        let tokens = ["hello", "brave", "new", "world", "!", "hello"];
        let ids = t.encode(&tokens.join(" ")).unwrap();
        assert_eq!(ids.len(), tokens.len());
        for (token, id) in tokens.iter().zip(&ids) {
            let expected = t.token_to_id(token).or(t.unk_id()).unwrap();
            assert_eq!(*id, expected, "{token}");
        }
    }

    #[test]
    fn sample_sentence_round_trips() {
        let corpus = "This is a test sentence. It was the last of the series.";
        let t = Tokenizer::from_corpus(corpus);
        let text = "This is a test sentence.";
        let ids = t.encode(text).unwrap();
        assert_eq!(ids.len(), 6);
        assert_eq!(t.decode(&ids).unwrap(), text);
    }

    #[test]
    fn whitespace_is_normalized_on_decode() {
        let t = greeting();
        let ids = t.encode("  hello ,\tworld\n!").unwrap();
        assert_eq!(t.decode(&ids).unwrap(), "hello, world!");
    }

    #[test]
    fn missing_unk_marker_fails_encode() {
        let t = Tokenizer::new(Vocabulary::build(["hello", "world"]));
        assert_eq!(t.unk_id(), None);
        assert_eq!(t.encode("hello world").unwrap(), [0, 1]);
        let err = t.encode("hello there world").unwrap_err();
        assert!(matches!(err, Error::UnknownToken(ref s) if s == "there"));
        // still usable afterwards
        assert_eq!(t.encode("world").unwrap(), [1]);
    }

    #[test]
    fn unassigned_id_fails_decode() {
        let t = greeting();
        let out_of_range = t.vocab_size() as utok;
        assert!(matches!(
            t.decode(&[0, out_of_range]),
            Err(Error::UnknownId(id)) if id == out_of_range
        ));
        assert!(matches!(t.decode(&[utok::MAX]), Err(Error::UnknownId(_))));
        assert_eq!(t.decode(&[]).unwrap(), "");
    }

    #[test]
    fn sparse_vocab_reports_gaps() {
        let vocab = Vocabulary::from_pairs([("hello", 0), ("world", 5)]).unwrap();
        let t = Tokenizer::from(vocab);
        assert_eq!(t.decode(&[0, 5]).unwrap(), "hello world");
        assert!(matches!(t.decode(&[2]), Err(Error::UnknownId(2))));
    }

    #[test]
    fn reverse_map_inverts_forward() {
        let t = Tokenizer::from_corpus(
            "It had always been his fate to have women say such things of him.",
        );
        for (token, id) in t.vocab().iter() {
            assert_eq!(t.id_to_token(id), Some(token));
        }
    }

    #[test]
    fn custom_marker() {
        let vocab = Vocabulary::build(["hello", "<unk>"]);
        let t = Tokenizer::with_unk_token(vocab.clone(), "<unk>");
        assert_eq!(t.encode("hello stranger").unwrap(), [1, 0]);
        assert!(Tokenizer::new(vocab).encode("stranger").is_err());
    }

    #[test]
    fn shared_across_threads() {
        let t = Arc::new(greeting());
        let handles = (0..4)
            .map(|_| {
                let t = Arc::clone(&t);
                std::thread::spawn(move || {
                    let ids = t.encode("hello, world!").unwrap();
                    t.decode(&ids).unwrap()
                })
            })
            .collect::<Vec<_>>();
        for h in handles {
            assert_eq!(h.join().unwrap(), "hello, world!");
        }
    }
}

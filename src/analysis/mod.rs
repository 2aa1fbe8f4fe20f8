//! Numeric summaries of vocabularies and tokenizations.
//!
//! Every report implements [`Display`](std::fmt::Display) as a short human-readable
//! block, which is what the command line prints.

use crate::{Encode, Result, Tokenizer, Vocabulary, utok};
use std::{
    collections::{HashMap, HashSet},
    fmt,
};

/// Shape of a vocabulary: size, characters, token lengths and token kinds.
#[derive(Clone, Debug, PartialEq)]
pub struct VocabStats {
    pub size: usize,
    pub unique_chars: usize,
    pub avg_len: f64,
    pub longest: String,
    pub shortest: String,
    /// Tokens made only of alphabetic characters.
    pub alphabetic: usize,
    /// Tokens made only of numeric characters.
    pub numeric: usize,
    /// Tokens that are not purely alphanumeric (punctuation, markers, mixed symbols).
    pub other: usize,
}

impl VocabStats {
    /// `None` for an empty vocabulary. Length ties go to the token with the smaller id.
    pub fn of(vocab: &Vocabulary) -> Option<Self> {
        let tokens = vocab.sorted_by_id();
        let first = tokens.first()?.0;

        let mut chars = HashSet::new();
        let mut total_len = 0;
        let (mut longest, mut shortest) = (first, first);
        let (mut alphabetic, mut numeric, mut other) = (0, 0, 0);
        for &(token, _) in &tokens {
            let len = token.chars().count();
            chars.extend(token.chars());
            total_len += len;
            if len > longest.chars().count() {
                longest = token;
            }
            if len < shortest.chars().count() {
                shortest = token;
            }
            if token.chars().all(char::is_alphabetic) {
                alphabetic += 1;
            }
            if token.chars().all(char::is_numeric) {
                numeric += 1;
            }
            if !token.chars().all(char::is_alphanumeric) {
                other += 1;
            }
        }

        Some(Self {
            size: tokens.len(),
            unique_chars: chars.len(),
            avg_len: total_len as f64 / tokens.len() as f64,
            longest: longest.to_owned(),
            shortest: shortest.to_owned(),
            alphabetic,
            numeric,
            other,
        })
    }

    fn percent(&self, n: usize) -> f64 {
        n as f64 / self.size as f64 * 100.
    }
}

impl fmt::Display for VocabStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vocabulary size: {}", self.size)?;
        writeln!(f, "Unique characters: {}", self.unique_chars)?;
        writeln!(f, "Average token length: {:.2}", self.avg_len)?;
        writeln!(
            f,
            "Longest token: {:?} (length: {})",
            self.longest,
            self.longest.chars().count()
        )?;
        writeln!(
            f,
            "Shortest token: {:?} (length: {})",
            self.shortest,
            self.shortest.chars().count()
        )?;
        writeln!(
            f,
            "Alphabetic tokens: {} ({:.1}%)",
            self.alphabetic,
            self.percent(self.alphabetic)
        )?;
        writeln!(
            f,
            "Numeric tokens: {} ({:.1}%)",
            self.numeric,
            self.percent(self.numeric)
        )?;
        write!(
            f,
            "Punctuation/Other: {} ({:.1}%)",
            self.other,
            self.percent(self.other)
        )
    }
}

/// Most frequent tokens of a token stream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenFrequencies {
    /// `(token, count)` by descending count, ties in order of first appearance.
    pub top: Vec<(String, usize)>,
    pub total: usize,
}

impl TokenFrequencies {
    pub fn count<T: AsRef<str>>(tokens: impl IntoIterator<Item = T>, top_n: usize) -> Self {
        let mut counts = HashMap::<String, (usize, usize)>::new();
        let mut total = 0;
        for token in tokens {
            let token = token.as_ref();
            let first_seen = counts.len();
            match counts.get_mut(token) {
                Some((count, _)) => *count += 1,
                None => {
                    counts.insert(token.to_owned(), (1, first_seen));
                }
            }
            total += 1;
        }

        let mut top = counts.into_iter().collect::<Vec<_>>();
        top.sort_unstable_by(|(_, (a, ia)), (_, (b, ib))| b.cmp(a).then(ia.cmp(ib)));
        top.truncate(top_n);
        Self {
            top: top.into_iter().map(|(t, (n, _))| (t, n)).collect(),
            total,
        }
    }

    /// Share of all tokens covered by [`Self::top`], in percent.
    pub fn coverage(&self) -> f64 {
        if self.total == 0 {
            return 0.;
        }
        let covered = self.top.iter().map(|(_, n)| n).sum::<usize>();
        covered as f64 / self.total as f64 * 100.
    }
}

impl fmt::Display for TokenFrequencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total tokens analyzed: {}", self.total)?;
        writeln!(
            f,
            "Top {} tokens represent {:.1}% of all tokens",
            self.top.len(),
            self.coverage()
        )?;
        for (token, n) in &self.top {
            writeln!(f, "  {token:?}: {n}")?;
        }
        Ok(())
    }
}

/// One side of a [`Comparison`].
#[derive(Clone, Debug, PartialEq)]
pub struct Encoded {
    pub name: String,
    pub ids: Vec<utok>,
    /// Characters of input per produced token, `0` when nothing was produced.
    pub chars_per_token: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winner {
    Left,
    Right,
    Tie,
}

/// Side-by-side efficiency of two tokenizers on the same text.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub text_chars: usize,
    pub left: Encoded,
    pub right: Encoded,
    pub winner: Winner,
    /// How much denser the winner is, in percent. `0` on a tie or when the loser
    /// produced no tokens.
    pub gain: f64,
}

impl Comparison {
    pub fn run(
        text: &str,
        (left_name, left): (&str, &impl Encode),
        (right_name, right): (&str, &impl Encode),
    ) -> Result<Self> {
        let text_chars = text.chars().count();
        let side = |name: &str, ids: Vec<utok>| Encoded {
            name: name.to_owned(),
            chars_per_token: ratio(text_chars, ids.len()),
            ids,
        };
        let left = side(left_name, left.encode(text)?);
        let right = side(right_name, right.encode(text)?);

        let (a, b) = (left.chars_per_token, right.chars_per_token);
        let (winner, gain) = if a > b {
            (Winner::Left, gain(a, b))
        } else if b > a {
            (Winner::Right, gain(b, a))
        } else {
            (Winner::Tie, 0.)
        };
        Ok(Self {
            text_chars,
            left,
            right,
            winner,
            gain,
        })
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Text length: {} characters", self.text_chars)?;
        for side in [&self.left, &self.right] {
            writeln!(f, "{}:", side.name)?;
            writeln!(f, "  Token count: {}", side.ids.len())?;
            writeln!(f, "  Token IDs: {:?}", side.ids)?;
            writeln!(f, "  Compression ratio: {:.2} chars/token", side.chars_per_token)?;
        }
        match self.winner {
            Winner::Left | Winner::Right => {
                let name = if self.winner == Winner::Left {
                    &self.left.name
                } else {
                    &self.right.name
                };
                writeln!(f, "More efficient: {name}")?;
                write!(f, "Efficiency gain: {:.1}%", self.gain)
            }
            Winner::Tie => write!(f, "Both tokenizers have equal efficiency"),
        }
    }
}

/// Aggregate tokenization figures over a batch of texts.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenizationStats {
    pub texts: usize,
    pub chars: usize,
    pub tokens: usize,
    pub avg_chars_per_text: f64,
    pub avg_tokens_per_text: f64,
    pub compression_ratio: f64,
    pub avg_token_len: f64,
    pub vocab_size: usize,
}

impl TokenizationStats {
    /// `Ok(None)` when `texts` is empty. Encode failures are returned as is.
    pub fn collect<T: AsRef<str>>(
        tokenizer: &Tokenizer,
        texts: impl IntoIterator<Item = T>,
    ) -> Result<Option<Self>> {
        let (mut n, mut chars, mut tokens, mut token_chars) = (0, 0, 0, 0);
        for text in texts {
            let text = text.as_ref();
            let ids = tokenizer.encode(text)?;
            n += 1;
            chars += text.chars().count();
            tokens += ids.len();
            token_chars += tokenizer
                .tokens(&ids)?
                .iter()
                .map(|t| t.chars().count())
                .sum::<usize>();
        }
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(Self {
            texts: n,
            chars,
            tokens,
            avg_chars_per_text: chars as f64 / n as f64,
            avg_tokens_per_text: tokens as f64 / n as f64,
            compression_ratio: ratio(chars, tokens),
            avg_token_len: ratio(token_chars, tokens),
            vocab_size: tokenizer.vocab_size(),
        }))
    }
}

impl fmt::Display for TokenizationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Texts: {}", self.texts)?;
        writeln!(f, "Characters: {}", self.chars)?;
        writeln!(f, "Tokens: {}", self.tokens)?;
        writeln!(f, "Average characters per text: {:.2}", self.avg_chars_per_text)?;
        writeln!(f, "Average tokens per text: {:.2}", self.avg_tokens_per_text)?;
        writeln!(f, "Compression ratio: {:.2} chars/token", self.compression_ratio)?;
        writeln!(f, "Average token length: {:.2}", self.avg_token_len)?;
        write!(f, "Vocabulary size: {}", self.vocab_size)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0. } else { num as f64 / den as f64 }
}

fn gain(winner: f64, loser: f64) -> f64 {
    if loser == 0. {
        0.
    } else {
        (winner - loser) / loser * 100.
    }
}

#[cfg(test)]
mod test_analysis {
    use super::*;
    use crate::{UNK_TOKEN, split};

    /// One id per character.
    struct Chars;

    impl Encode for Chars {
        fn encode(&self, text: &str) -> Result<Vec<utok>> {
            Ok(text.chars().map(|c| c as utok).collect())
        }
    }

    #[test]
    fn vocab_stats_counts_kinds() {
        let vocab = Vocabulary::build(["hello", "world", ",", "!", "42", "abc1", UNK_TOKEN]);
        let stats = VocabStats::of(&vocab).unwrap();
        assert_eq!(stats.size, 7);
        assert_eq!(stats.alphabetic, 2);
        assert_eq!(stats.numeric, 1);
        assert_eq!(stats.other, 3);
        assert_eq!(stats.longest, UNK_TOKEN);
        assert_eq!(stats.shortest, "!");
        assert!((stats.avg_len - 25. / 7.).abs() < 1e-9);
        assert!(stats.to_string().contains("Vocabulary size: 7"));
    }

    #[test]
    fn vocab_stats_of_empty_is_none() {
        assert_eq!(VocabStats::of(&Vocabulary::default()), None);
    }

    #[test]
    fn unique_chars_span_all_tokens() {
        let stats = VocabStats::of(&Vocabulary::build(["ab", "bc", "ca"])).unwrap();
        assert_eq!(stats.unique_chars, 3);
        assert_eq!(stats.longest, "ab");
        assert_eq!(stats.shortest, "ab");
    }

    #[test]
    fn frequencies_break_ties_by_first_seen() {
        let tokens = split("the cat saw the dog , the dog saw a cat .");
        let freq = TokenFrequencies::count(&tokens, 3);
        assert_eq!(freq.total, tokens.len());
        assert_eq!(
            freq.top,
            [
                ("the".to_string(), 3),
                ("cat".to_string(), 2),
                ("saw".to_string(), 2)
            ]
        );
        assert!((freq.coverage() - 7. / 12. * 100.).abs() < 1e-9);
    }

    #[test]
    fn frequencies_of_nothing() {
        let freq = TokenFrequencies::count(Vec::<&str>::new(), 5);
        assert!(freq.top.is_empty());
        assert_eq!(freq.coverage(), 0.);
    }

    #[test]
    fn words_beat_characters() {
        let t = Tokenizer::from_corpus("The quick brown fox jumps over the lazy dog.");
        let text = "The quick brown fox";
        let cmp = Comparison::run(text, ("words", &t), ("chars", &Chars)).unwrap();
        assert_eq!(cmp.text_chars, 19);
        assert_eq!(cmp.left.ids.len(), 4);
        assert_eq!(cmp.right.ids.len(), 19);
        assert_eq!(cmp.winner, Winner::Left);
        assert!((cmp.gain - (19. / 4. - 1.) * 100.).abs() < 1e-9);
        assert!(cmp.to_string().contains("More efficient: words"));
    }

    #[test]
    fn identical_tokenizers_tie() {
        let cmp = Comparison::run("abc", ("a", &Chars), ("b", &Chars)).unwrap();
        assert_eq!(cmp.winner, Winner::Tie);
        assert_eq!(cmp.gain, 0.);
    }

    #[test]
    fn comparison_propagates_encode_failure() {
        let strict = Tokenizer::new(Vocabulary::build(["known"]));
        assert!(Comparison::run("unknown", ("strict", &strict), ("chars", &Chars)).is_err());
    }

    #[test]
    fn tokenization_stats_over_texts() {
        let t = Tokenizer::from_corpus("Hello world! This is a test.");
        let texts = ["Hello world!", "This is a test."];
        let stats = TokenizationStats::collect(&t, texts).unwrap().unwrap();
        assert_eq!(stats.texts, 2);
        assert_eq!(stats.chars, 27);
        assert_eq!(stats.tokens, 8);
        assert_eq!(stats.vocab_size, t.vocab_size());
        assert!((stats.compression_ratio - 27. / 8.).abs() < 1e-9);
        // Hello world ! This is a test .
        assert!((stats.avg_token_len - 23. / 8.).abs() < 1e-9);
    }

    #[test]
    fn tokenization_stats_of_nothing() {
        let t = Tokenizer::from_corpus("anything");
        assert_eq!(TokenizationStats::collect(&t, Vec::<String>::new()).unwrap(), None);
    }
}

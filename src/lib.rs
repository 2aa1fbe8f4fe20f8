pub mod analysis;
pub mod config;
pub mod corpus;
mod error;
pub mod split;
mod tokenizer;
pub mod vocab;

pub use error::{Error, Result};
pub use split::{join, split};
pub use tokenizer::Tokenizer;
pub use vocab::Vocabulary;

/// `utok` for token id.
#[allow(non_camel_case_types)]
pub type utok = u32;

/// Reserved token substituted for out-of-vocabulary words during encode.
pub const UNK_TOKEN: &str = "<|unk|>";

/// Anything that turns text into a sequence of token ids.
///
/// The analysis helpers only need this capability, so any tokenizer can be compared
/// against [`Tokenizer`] by implementing it.
pub trait Encode {
    fn encode(&self, text: &str) -> Result<Vec<utok>>;
}

impl<T: Encode + ?Sized> Encode for &T {
    #[inline]
    fn encode(&self, text: &str) -> Result<Vec<utok>> {
        (**self).encode(text)
    }
}

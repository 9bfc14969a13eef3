//! Readers for text interchange formats.
#[cfg(feature = "jcamp")]
pub mod jcamp;

#[cfg(feature = "jcamp")]
pub use crate::io::jcamp::{JcampError, JcampParserState, JcampReader, XYDATA_TAGS};

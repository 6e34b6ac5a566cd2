//! Token abstractions for trie edges and query sequences.
//!
//! A [`Token`] is the atomic unit compared during matching. Any cloneable,
//! hashable type qualifies, so vocabularies can be built over characters,
//! bytes, phoneme symbols or interned multi-character units.
//!
//! [`TextUnit`] adds conversion to and from strings for the two textual
//! granularities, byte-level ([`u8`]) and character-level ([`char`]).

use std::fmt::Debug;
use std::hash::Hash;

/// Atomic comparison unit.
///
/// Blanket-implemented for every type satisfying the bounds; there is nothing
/// to implement by hand.
pub trait Token: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> Token for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// Tokens that can be produced from, and rendered back into, text.
///
/// # Granularity
///
/// - **Byte-level (u8)**: one token per UTF-8 byte. Multi-byte characters
///   cost several edits to change.
/// - **Character-level (char)**: one token per Unicode scalar value. Edit
///   costs are counted in characters.
pub trait TextUnit: Token + Copy {
    /// Split a string into tokens.
    fn from_str(s: &str) -> Vec<Self>;

    /// Render tokens back into a string.
    ///
    /// For `u8` invalid UTF-8 sequences are replaced lossily.
    fn to_string(units: &[Self]) -> String;
}

impl TextUnit for u8 {
    #[inline]
    fn from_str(s: &str) -> Vec<Self> {
        s.as_bytes().to_vec()
    }

    #[inline]
    fn to_string(units: &[Self]) -> String {
        String::from_utf8_lossy(units).into_owned()
    }
}

impl TextUnit for char {
    #[inline]
    fn from_str(s: &str) -> Vec<Self> {
        s.chars().collect()
    }

    #[inline]
    fn to_string(units: &[Self]) -> String {
        units.iter().collect()
    }
}

//! Preprocessing hook applied to terms and queries before comparison.
//!
//! The engine does not ship normalization functions of its own. Callers plug
//! in any function with the contract "maps one sequence to a canonical sequence
//! of the same token type", e.g. case folding:
//!
//! ```rust
//! use fuzzytrie::dictionary::Normalizer;
//!
//! let lowercase = |tokens: &[char]| -> Vec<char> {
//!     tokens.iter().flat_map(|c| c.to_lowercase()).collect()
//! };
//! assert_eq!(lowercase.normalize(&['A', 'b'][..]).as_ref(), &['a', 'b']);
//! ```

use std::borrow::Cow;

/// A canonicalization function over token sequences.
///
/// The same normalizer must be applied to every inserted term and every
/// query, otherwise exact matches can be missed.
/// [`MatcherBuilder`](crate::matcher::MatcherBuilder) enforces this by applying
/// one normalizer to both.
pub trait Normalizer<T: Clone>: Send + Sync {
    /// Map `tokens` to their canonical form.
    fn normalize<'a>(&self, tokens: &'a [T]) -> Cow<'a, [T]>;
}

/// Normalizer that leaves sequences unchanged (raw comparison).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Identity;

impl<T: Clone> Normalizer<T> for Identity {
    #[inline]
    fn normalize<'a>(&self, tokens: &'a [T]) -> Cow<'a, [T]> {
        Cow::Borrowed(tokens)
    }
}

impl<T, F> Normalizer<T> for F
where
    T: Clone,
    F: Fn(&[T]) -> Vec<T> + Send + Sync,
{
    #[inline]
    fn normalize<'a>(&self, tokens: &'a [T]) -> Cow<'a, [T]> {
        Cow::Owned(self(tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_borrows() {
        let tokens = ['a', 'B'];
        let normalized = Identity.normalize(&tokens[..]);
        assert!(matches!(normalized, Cow::Borrowed(_)));
        assert_eq!(normalized.as_ref(), &tokens);
    }

    #[test]
    fn test_closure_normalizer() {
        let upper = |tokens: &[char]| -> Vec<char> {
            tokens.iter().map(|c| c.to_ascii_uppercase()).collect()
        };
        assert_eq!(upper.normalize(&['a', 'b'][..]).as_ref(), &['A', 'B']);
    }

    #[test]
    fn test_boxed_normalizer() {
        let dedup: Box<dyn Fn(&[u8]) -> Vec<u8> + Send + Sync> = Box::new(|tokens: &[u8]| {
            let mut out = tokens.to_vec();
            out.dedup();
            out
        });
        assert_eq!(dedup.normalize(&b"aabbc"[..]).as_ref(), b"abc");
    }
}

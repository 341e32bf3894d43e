//! The set of structural tokens the parser accepts at a position.
//!
//! The parser hands one of these to every scan call. Bitset-backed for
//! O(1) membership testing, with `const` builders so hosts can declare
//! their common sets as constants.

use crate::token::TokenKind;

const _: () = assert!(
    TokenKind::COUNT <= 16,
    "ValidSymbols uses a u16 bitset; all kinds must fit"
);

/// A set of [`TokenKind`]s.
///
/// # Example
/// ```
/// use verse_scanner::{TokenKind, ValidSymbols};
///
/// const AFTER_EXPR: ValidSymbols = ValidSymbols::new()
///     .with(TokenKind::AutoTerminator)
///     .with(TokenKind::BestGuessAttrStart);
///
/// assert!(AFTER_EXPR.contains(TokenKind::AutoTerminator));
/// assert!(!AFTER_EXPR.contains(TokenKind::Indent));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ValidSymbols(u16);

impl ValidSymbols {
    /// Every structural token. Tree-sitter style hosts pass this while the
    /// parser is recovering from a syntax error.
    pub const ALL: Self = Self((1 << TokenKind::COUNT) - 1);

    /// Create an empty set.
    #[inline]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Create a set containing a single kind.
    #[inline]
    pub const fn single(kind: TokenKind) -> Self {
        Self(1 << kind as u16)
    }

    /// Add a kind to this set (builder pattern for const contexts).
    #[inline]
    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | (1 << kind as u16))
    }

    /// Remove a kind from this set.
    #[inline]
    #[must_use]
    pub const fn without(self, kind: TokenKind) -> Self {
        Self(self.0 & !(1 << kind as u16))
    }

    /// Union of two sets.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check if this set contains a kind.
    #[inline]
    pub const fn contains(self, kind: TokenKind) -> bool {
        (self.0 & (1 << kind as u16)) != 0
    }

    /// Check if this set contains any kind of `other`.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Check if this set is empty.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Build a set from a tree-sitter style `valid_symbols` array.
    ///
    /// Entry `i` corresponds to the kind with discriminant `i`; extra
    /// entries are ignored.
    pub fn from_flags(flags: &[bool]) -> Self {
        TokenKind::ALL
            .iter()
            .zip(flags)
            .filter(|(_, on)| **on)
            .fold(Self::new(), |set, (&kind, _)| set.with(kind))
    }

    /// Iterate over the kinds in this set, in discriminant order.
    pub fn iter(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL.into_iter().filter(move |&k| self.contains(k))
    }
}

impl FromIterator<TokenKind> for ValidSymbols {
    fn from_iter<I: IntoIterator<Item = TokenKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

impl std::fmt::Debug for ValidSymbols {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

//! Relative position of two nodes in a tree.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{BitAnd, BitOr};

/// Bitmask describing where `other` lies relative to a reference node.
///
/// The flag values follow the DOM `compareDocumentPosition` constants, so a
/// tree backed by a browser DOM can pass its result straight through.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DocumentPosition(u16);

impl DocumentPosition {
    /// The nodes are in different trees.
    pub const DISCONNECTED: Self = Self(1);
    /// `other` comes before the reference node.
    pub const PRECEDING: Self = Self(2);
    /// `other` comes after the reference node.
    pub const FOLLOWING: Self = Self(4);
    /// `other` is an ancestor of the reference node.
    pub const CONTAINS: Self = Self(8);
    /// `other` is a descendant of the reference node.
    pub const CONTAINED_BY: Self = Self(16);
    /// The preceding/following bit was chosen arbitrarily.
    pub const IMPLEMENTATION_SPECIFIC: Self = Self(32);

    /// Build a position from raw DOM bits.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw DOM bits.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Whether every bit of `flag` is set.
    #[must_use]
    pub const fn contains(self, flag: Self) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// Whether the nodes are the same (no bits set).
    #[must_use]
    pub const fn is_same(self) -> bool {
        self.0 == 0
    }

    /// Sort order of the reference node relative to `other`.
    ///
    /// Preceding and containing nodes weigh positively, following and
    /// contained nodes negatively; a positive total puts the reference node
    /// after `other`. An ancestor therefore always sorts before its
    /// descendants.
    ///
    /// # Examples
    /// ```
    /// use std::cmp::Ordering;
    /// use footnotes::dom::DocumentPosition;
    ///
    /// let other_follows = DocumentPosition::FOLLOWING;
    /// assert_eq!(other_follows.document_order(), Ordering::Less);
    ///
    /// let other_is_ancestor = DocumentPosition::CONTAINS | DocumentPosition::PRECEDING;
    /// assert_eq!(other_is_ancestor.document_order(), Ordering::Greater);
    /// ```
    #[must_use]
    pub fn document_order(self) -> Ordering {
        let bit = |flag: Self| i32::from((self & flag).0);
        let score = bit(Self::PRECEDING) + bit(Self::CONTAINS)
            - bit(Self::FOLLOWING)
            - bit(Self::CONTAINED_BY);
        score.cmp(&0)
    }
}

impl BitOr for DocumentPosition {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for DocumentPosition {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for DocumentPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(DocumentPosition, &str); 6] = [
            (DocumentPosition::DISCONNECTED, "DISCONNECTED"),
            (DocumentPosition::PRECEDING, "PRECEDING"),
            (DocumentPosition::FOLLOWING, "FOLLOWING"),
            (DocumentPosition::CONTAINS, "CONTAINS"),
            (DocumentPosition::CONTAINED_BY, "CONTAINED_BY"),
            (DocumentPosition::IMPLEMENTATION_SPECIFIC, "IMPLEMENTATION_SPECIFIC"),
        ];
        if self.is_same() {
            return f.write_str("DocumentPosition(SAME)");
        }
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "DocumentPosition({})", names.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_order_siblings() {
        assert_eq!(DocumentPosition::FOLLOWING.document_order(), Ordering::Less);
        assert_eq!(
            DocumentPosition::PRECEDING.document_order(),
            Ordering::Greater
        );
    }

    #[test]
    fn test_document_order_containment() {
        let descendant = DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING;
        assert_eq!(descendant.document_order(), Ordering::Less);

        let ancestor = DocumentPosition::CONTAINS | DocumentPosition::PRECEDING;
        assert_eq!(ancestor.document_order(), Ordering::Greater);
    }

    #[test]
    fn test_document_order_same_node() {
        assert_eq!(DocumentPosition::default().document_order(), Ordering::Equal);
    }

    #[test]
    fn test_contains_and_bits() {
        let position = DocumentPosition::DISCONNECTED
            | DocumentPosition::IMPLEMENTATION_SPECIFIC
            | DocumentPosition::FOLLOWING;
        assert_eq!(position.bits(), 37);
        assert!(position.contains(DocumentPosition::FOLLOWING));
        assert!(!position.contains(DocumentPosition::PRECEDING));
        assert_eq!(DocumentPosition::from_bits(37), position);
    }

    #[test]
    fn test_debug_lists_flags() {
        let position = DocumentPosition::CONTAINS | DocumentPosition::PRECEDING;
        assert_eq!(
            format!("{position:?}"),
            "DocumentPosition(PRECEDING | CONTAINS)"
        );
    }
}

//! The kind lattice of optics.
//!
//! Every optic is classified by four orthogonal capabilities:
//!
//! - **read many** (`fold`): produce an ordered, possibly empty sequence of foci
//! - **single focus** (`single`): the read always produces exactly one focus
//! - **write** (`write`): produce a new state from replacement foci
//! - **construct** (`construct`): build a whole state from a focus alone
//!
//! Reading a single focus (`get`) is available whenever `fold` is; it picks
//! the first focus and may fail with `NoFocus` unless `single` holds.
//!
//! | Kind | fold | single | write | construct |
//! |---|---|---|---|---|
//! | Iso | yes | yes | yes | yes |
//! | Lens | yes | yes | yes | no |
//! | Prism | yes | no | yes | yes |
//! | Traversal | yes | no | yes | no |
//! | Getter | yes | yes | no | no |
//! | Fold | yes | no | no | no |
//! | Setter | no | no | yes | no |
//! | Review | no | no | no | yes |
//!
//! Composing two optics intersects their capabilities. The eight named kinds
//! are closed under intersection, so every composition is either a named
//! kind or has no capability at all, in which case it is rejected.
//!
//! # Examples
//!
//! ```
//! use lensing::optics::Kind;
//!
//! assert_eq!(Kind::Lens.compose(Kind::Prism), Some(Kind::Traversal));
//! assert_eq!(Kind::Getter.compose(Kind::Prism), Some(Kind::Fold));
//! assert_eq!(Kind::Fold.compose(Kind::Setter), None);
//! ```

use std::fmt;
use std::ops::BitAnd;

/// A set of optic capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    /// Can produce an ordered sequence of foci.
    pub fold: bool,
    /// Always produces exactly one focus when reading.
    pub single: bool,
    /// Can produce a new state from replacement foci.
    pub write: bool,
    /// Can build a state from a focus without an old state.
    pub construct: bool,
}

impl Capabilities {
    /// The empty capability set.
    pub const NONE: Self = Self::new(false, false, false, false);

    /// Creates a capability set.
    #[must_use]
    pub const fn new(fold: bool, single: bool, write: bool, construct: bool) -> Self {
        Self {
            fold,
            single,
            write,
            construct,
        }
    }

    /// Returns `true` if no capability is present.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !(self.fold || self.single || self.write || self.construct)
    }

    /// Returns `true` if every capability of `other` is present in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        (self.fold || !other.fold)
            && (self.single || !other.single)
            && (self.write || !other.write)
            && (self.construct || !other.construct)
    }
}

impl BitAnd for Capabilities {
    type Output = Self;

    fn bitand(self, other: Self) -> Self {
        Self::new(
            self.fold && other.fold,
            self.single && other.single,
            self.write && other.write,
            self.construct && other.construct,
        )
    }
}

/// The named kinds of optic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Lossless two-way conversion; can do everything.
    Iso,
    /// Exactly one focus; read and write.
    Lens,
    /// Zero or one focus; read, write and construct.
    Prism,
    /// Any number of foci; read and write.
    Traversal,
    /// Exactly one focus; read only.
    Getter,
    /// Any number of foci; read only.
    Fold,
    /// Write only.
    Setter,
    /// Construct only.
    Review,
}

impl Kind {
    /// Every kind, in order of decreasing capability.
    pub const ALL: [Self; 8] = [
        Self::Iso,
        Self::Prism,
        Self::Review,
        Self::Lens,
        Self::Traversal,
        Self::Getter,
        Self::Setter,
        Self::Fold,
    ];

    /// Returns the capabilities of this kind.
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Self::Iso => Capabilities::new(true, true, true, true),
            Self::Lens => Capabilities::new(true, true, true, false),
            Self::Prism => Capabilities::new(true, false, true, true),
            Self::Traversal => Capabilities::new(true, false, true, false),
            Self::Getter => Capabilities::new(true, true, false, false),
            Self::Fold => Capabilities::new(true, false, false, false),
            Self::Setter => Capabilities::new(false, false, true, false),
            Self::Review => Capabilities::new(false, false, false, true),
        }
    }

    /// Returns the kind whose capabilities are exactly `capabilities`.
    #[must_use]
    pub fn from_capabilities(capabilities: Capabilities) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.capabilities() == capabilities)
    }

    /// Returns the kind of this optic composed with an optic of kind `other`.
    ///
    /// Returns `None` when the two kinds share no capability.
    #[must_use]
    pub fn compose(self, other: Self) -> Option<Self> {
        let capabilities = self.capabilities() & other.capabilities();
        if capabilities.is_empty() {
            return None;
        }
        Self::from_capabilities(capabilities)
    }

    /// Returns `true` if an optic of this kind can also be used as `other`.
    #[must_use]
    pub const fn is_a(self, other: Self) -> bool {
        self.capabilities().contains(other.capabilities())
    }

    /// Returns `true` if foci can be read (`get` and `collect`).
    #[must_use]
    pub const fn can_read(self) -> bool {
        self.capabilities().fold
    }

    /// Returns `true` if foci can be written (`set` and `modify`).
    #[must_use]
    pub const fn can_write(self) -> bool {
        self.capabilities().write
    }

    /// Returns `true` if states can be built from a focus (`construct`).
    #[must_use]
    pub const fn can_construct(self) -> bool {
        self.capabilities().construct
    }

    /// Returns `true` if a read may yield no focus for some state.
    #[must_use]
    pub const fn may_be_empty(self) -> bool {
        !self.capabilities().single
    }

    /// Returns the name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Iso => "Iso",
            Self::Lens => "Lens",
            Self::Prism => "Prism",
            Self::Traversal => "Traversal",
            Self::Getter => "Getter",
            Self::Fold => "Fold",
            Self::Setter => "Setter",
            Self::Review => "Review",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_every_kind_round_trips_through_capabilities() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_capabilities(kind.capabilities()), Some(kind));
        }
    }

    #[rstest]
    fn test_kinds_closed_under_intersection() {
        for left in Kind::ALL {
            for right in Kind::ALL {
                let capabilities = left.capabilities() & right.capabilities();
                if !capabilities.is_empty() {
                    assert!(
                        Kind::from_capabilities(capabilities).is_some(),
                        "{left} & {right} has no named kind"
                    );
                }
            }
        }
    }

    #[rstest]
    fn test_compose_is_commutative() {
        for left in Kind::ALL {
            for right in Kind::ALL {
                assert_eq!(left.compose(right), right.compose(left));
            }
        }
    }

    #[rstest]
    fn test_compose_with_self_is_identity() {
        for kind in Kind::ALL {
            assert_eq!(kind.compose(kind), Some(kind));
        }
    }

    #[rstest]
    #[case(Kind::Iso, Kind::Lens, true)]
    #[case(Kind::Iso, Kind::Prism, true)]
    #[case(Kind::Lens, Kind::Getter, true)]
    #[case(Kind::Lens, Kind::Prism, false)]
    #[case(Kind::Prism, Kind::Review, true)]
    #[case(Kind::Traversal, Kind::Setter, true)]
    #[case(Kind::Getter, Kind::Setter, false)]
    fn test_is_a(#[case] kind: Kind, #[case] other: Kind, #[case] expected: bool) {
        assert_eq!(kind.is_a(other), expected);
    }

    #[rstest]
    fn test_may_be_empty() {
        assert!(Kind::Prism.may_be_empty());
        assert!(Kind::Traversal.may_be_empty());
        assert!(!Kind::Lens.may_be_empty());
        assert!(!Kind::Getter.may_be_empty());
    }

    #[rstest]
    fn test_display() {
        assert_eq!(Kind::Traversal.to_string(), "Traversal");
    }
}

use core::fmt;

use bitflags::bitflags;

// -----------------------------------------------------------------------------
// Modifiers

bitflags! {
    /// Visibility and modifier bits of a declared member.
    ///
    /// Exactly one of the visibility bits is expected to be set.
    /// A bitmap without any visibility bit is treated as public.
    ///
    /// The same type is used as the "excluded modifiers" mask of the
    /// exclusion engine, where a member is skipped when it shares any bit
    /// with the mask.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_object::{Modifiers, Visibility};
    ///
    /// let m = Modifiers::PRIVATE | Modifiers::STATIC;
    /// assert_eq!(m.visibility(), Visibility::Private);
    /// assert!(m.intersects(Modifiers::STATIC));
    /// assert_eq!(Modifiers::empty().visibility(), Visibility::Public);
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const READONLY = 1 << 4;
        const ABSTRACT = 1 << 5;
        const FINAL = 1 << 6;
    }
}

impl Default for Modifiers {
    #[inline]
    fn default() -> Self {
        Self::PUBLIC
    }
}

impl Modifiers {
    /// Returns the visibility encoded in the bitmap.
    ///
    /// The most restrictive bit wins if several are set.
    pub fn visibility(self) -> Visibility {
        if self.contains(Self::PRIVATE) {
            Visibility::Private
        } else if self.contains(Self::PROTECTED) {
            Visibility::Protected
        } else {
            Visibility::Public
        }
    }

    /// Returns `true` if the member is reachable from any scope.
    #[inline]
    pub fn is_public(self) -> bool {
        self.visibility() == Visibility::Public
    }

    /// Returns `true` if the member belongs to the class rather than to instances.
    #[inline]
    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    /// Replaces the visibility bits, keeping the other modifiers.
    #[inline]
    pub fn with_visibility(self, visibility: Visibility) -> Self {
        let rest = self.difference(Self::PUBLIC | Self::PROTECTED | Self::PRIVATE);
        rest | visibility.bit()
    }
}

// -----------------------------------------------------------------------------
// Visibility

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    #[inline]
    const fn bit(self) -> Modifiers {
        match self {
            Self::Public => Modifiers::PUBLIC,
            Self::Protected => Modifiers::PROTECTED,
            Self::Private => Modifiers::PRIVATE,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Modifiers, Visibility};

    #[test]
    fn with_visibility_keeps_other_bits() {
        let m = (Modifiers::PUBLIC | Modifiers::STATIC).with_visibility(Visibility::Private);
        assert_eq!(m, Modifiers::PRIVATE | Modifiers::STATIC);
        assert!(!m.is_public());
        assert!(m.is_static());
    }
}

use std::fmt;

use strata_classfile::access_flags::*;

/// JVM access flags of a type or member.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Modifiers(u16);

impl Modifiers {
    pub const PUBLIC: Modifiers = Modifiers(ACC_PUBLIC);
    pub const PRIVATE: Modifiers = Modifiers(ACC_PRIVATE);
    pub const PROTECTED: Modifiers = Modifiers(ACC_PROTECTED);
    pub const STATIC: Modifiers = Modifiers(ACC_STATIC);
    pub const FINAL: Modifiers = Modifiers(ACC_FINAL);
    pub const INTERFACE: Modifiers = Modifiers(ACC_INTERFACE);
    pub const ABSTRACT: Modifiers = Modifiers(ACC_ABSTRACT);
    pub const SYNTHETIC: Modifiers = Modifiers(ACC_SYNTHETIC);
    pub const ANNOTATION: Modifiers = Modifiers(ACC_ANNOTATION);
    pub const ENUM: Modifiers = Modifiers(ACC_ENUM);

    pub const fn from_bits(bits: u16) -> Self {
        Modifiers(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    pub fn is_private(self) -> bool {
        self.contains(Self::PRIVATE)
    }

    pub fn is_protected(self) -> bool {
        self.contains(Self::PROTECTED)
    }

    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    pub fn is_final(self) -> bool {
        self.contains(Self::FINAL)
    }

    pub fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Modifiers({:#06x})", self.0)
    }
}

impl fmt::Display for Modifiers {
    /// Source-order keywords for the visibility/static/final/abstract bits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keywords = [
            (Self::PUBLIC, "public"),
            (Self::PROTECTED, "protected"),
            (Self::PRIVATE, "private"),
            (Self::ABSTRACT, "abstract"),
            (Self::STATIC, "static"),
            (Self::FINAL, "final"),
        ];
        let mut first = true;
        for (flag, keyword) in keywords {
            if self.contains(flag) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(keyword)?;
                first = false;
            }
        }
        Ok(())
    }
}

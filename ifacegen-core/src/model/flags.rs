//! Access levels and extension modifiers.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Declared accessibility of a type, member or accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    #[default]
    Public,
    Protected,
    Internal,
    ProtectedInternal,
    PrivateProtected,
    Private,
}

impl Access {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Internal => "internal",
            Self::ProtectedInternal => "protected internal",
            Self::PrivateProtected => "private protected",
            Self::Private => "private",
        }
    }

    pub fn is_public(self) -> bool {
        self == Self::Public
    }
}

bitflags! {
    /// Extension modifiers on a type or member.
    ///
    /// `SEALED | ABSTRACT` together mean "static-like".
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SEALED = 1;
        const ABSTRACT = 1 << 1;
        const VIRTUAL = 1 << 2;
        const OVERRIDE = 1 << 3;
        const NEW = 1 << 4;
        const STATIC = Self::SEALED.bits() | Self::ABSTRACT.bits();
    }
}

impl Modifiers {
    /// The single modifier keyword emitted for a concrete declaration.
    ///
    /// First match wins; remaining flags are ignored for textual purposes.
    pub fn keyword(self) -> Option<&'static str> {
        if self.contains(Self::STATIC) {
            Some("static")
        } else if self.contains(Self::SEALED) {
            Some("sealed")
        } else if self.contains(Self::ABSTRACT) {
            Some("abstract")
        } else if self.contains(Self::VIRTUAL) {
            Some("virtual")
        } else if self.contains(Self::OVERRIDE) {
            Some("override")
        } else if self.contains(Self::NEW) {
            Some("new")
        } else {
            None
        }
    }

    pub fn is_static_like(self) -> bool {
        self.contains(Self::STATIC)
    }
}

//! Class identity
//!
//! Provides [`ClassId`], a strongly-typed 32-byte hash of a class's
//! qualified name. Classes are keyed by `ClassId` everywhere inside the
//! pipeline; the spelled name travels as metadata only, which removes the
//! silent-typo failure mode of referencing classes by raw strings.

use std::fmt::{self, Display, Formatter};

/// A 32-byte class identifier (Blake3 of the qualified name)
///
/// Immutable and cheap to clone (Copy). Two classes compare equal exactly
/// when their qualified names are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId([u8; 32]);

impl ClassId {
    /// Create a `ClassId` from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive the id of a class from its qualified name
    #[inline]
    #[must_use]
    pub fn of(qualified_name: &str) -> Self {
        let hash = blake3::hash(qualified_name.as_bytes());
        Self(*hash.as_bytes())
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ClassId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short())
    }
}

//! The [`Component`] trait and the [`ComponentKind`] discriminant.
//!
//! A component type names itself with a short snake_case string. Its kind is
//! the FNV-1a 64-bit hash of that string, so the store indexes by integer while
//! mutex groups are declared with the readable names.

use serde::{Deserialize, Serialize};

/// Structural type of a component; an entity holds at most one per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentKind(pub u64);

impl ComponentKind {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    /// FNV-1a 64-bit over the UTF-8 bytes of `name`.
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash = (hash ^ bytes[i] as u64).wrapping_mul(Self::PRIME);
            i += 1;
        }
        Self(hash)
    }

    #[must_use]
    pub fn of<T: Component>() -> Self {
        T::kind()
    }
}

/// Plain data attached to an entity.
///
/// Entity handles stored inside a component are non-owning: the referenced
/// entity may be gone by the next lookup.
///
/// ```rust
/// use arena_component::Component;
///
/// #[derive(Debug)]
/// struct Shield(f32);
///
/// impl Component for Shield {
///     fn type_name() -> &'static str { "shield" }
/// }
/// ```
pub trait Component: std::fmt::Debug + 'static {
    fn type_name() -> &'static str;

    fn kind() -> ComponentKind {
        ComponentKind::from_name(Self::type_name())
    }
}

//! Error types for component storage.

use crate::entity::Entity;

/// Programmer errors raised by the component store.
///
/// Both variants indicate a logic defect in the calling system; missing
/// components are reported as `None`, never as an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// The entity was never created or has already been destroyed.
    #[error("{0} does not exist")]
    UnknownEntity(Entity),

    /// The entity already owns a component of this kind.
    #[error("{entity} already has a `{kind}` component")]
    DuplicateComponent {
        /// The entity the add was attempted on.
        entity: Entity,
        /// Name of the duplicated kind.
        kind: &'static str,
    },
}

//! Office ownership of scoped entities.

use crate::id::OfficeId;

/// A resource owned by exactly one exchange office.
///
/// Ownership is set at creation and immutable thereafter. Entities whose
/// office is derived transitively (e.g. a client's segment history) do not
/// implement this; their owning office is resolved through the parent record
/// before any scope check.
pub trait OwnedByOffice {
    fn owning_office(&self) -> Option<OfficeId>;
}

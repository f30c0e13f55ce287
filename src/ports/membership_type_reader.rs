//! Membership type reader port (read side).
//!
//! Types are managed by staff elsewhere; the form only reads them.

use crate::domain::foundation::{DomainError, MembershipTypeId};
use crate::domain::membership::MembershipType;
use async_trait::async_trait;

/// Reader port for membership types.
#[async_trait]
pub trait MembershipTypeReader: Send + Sync {
    /// Find a type by id within an entity, open or not.
    async fn find_by_id(
        &self,
        id: MembershipTypeId,
        entity: i32,
    ) -> Result<Option<MembershipType>, DomainError>;

    /// Types offered on the public form, ordered by label, with their
    /// active member counts.
    async fn list_open(&self, entity: i32) -> Result<Vec<MembershipType>, DomainError>;
}

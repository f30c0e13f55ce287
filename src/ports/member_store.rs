//! Member store port.
//!
//! Defines the contract for persisting and retrieving members. Writes made
//! by a form submission go through a `MemberUnitOfWork` so that validation
//! and persistence share one transaction.
//!
//! # Example
//!
//! ```ignore
//! async fn register(store: &dyn MemberStore, new_member: &NewMember) -> Result<MemberId, DomainError> {
//!     let mut uow = store.begin().await?;
//!     if let Some(login) = new_member.credentials.as_ref().map(|c| c.login.as_str()) {
//!         if uow.login_exists(login, None).await? {
//!             uow.rollback().await?;
//!             return Err(DomainError::new(ErrorCode::LoginAlreadyExists, "login taken"));
//!         }
//!     }
//!     let id = uow.insert(new_member).await?;
//!     uow.commit().await?;
//!     Ok(id)
//! }
//! ```

use crate::domain::foundation::{DomainError, MemberId};
use crate::domain::membership::{Member, NewMember, RenewalToken};
use async_trait::async_trait;

/// Store port for members.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Opens a transaction for one form submission.
    async fn begin(&self) -> Result<Box<dyn MemberUnitOfWork>, DomainError>;

    /// Find a member by id. Returns `None` if not found.
    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, DomainError>;

    /// Most recently created member with this email in the given entity.
    async fn find_latest_by_email(
        &self,
        email: &str,
        entity: i32,
    ) -> Result<Option<Member>, DomainError>;

    /// Stores a renewal token on a member, touching nothing else.
    ///
    /// # Errors
    ///
    /// - `MemberNotFound` if the member doesn't exist
    async fn store_renewal_token(
        &self,
        id: MemberId,
        token: &RenewalToken,
    ) -> Result<(), DomainError>;
}

/// Transactional writes for one submission.
///
/// Dropping a unit of work without committing discards its writes.
#[async_trait]
pub trait MemberUnitOfWork: Send {
    /// True when a member other than `except` already uses `login`.
    async fn login_exists(
        &mut self,
        login: &str,
        except: Option<MemberId>,
    ) -> Result<bool, DomainError>;

    /// Inserts a member and returns its new id.
    ///
    /// # Errors
    ///
    /// - `LoginAlreadyExists` when the login is taken
    /// - `DatabaseError` on persistence failure
    async fn insert(&mut self, member: &NewMember) -> Result<MemberId, DomainError>;

    /// Overwrites the editable fields of a member.
    ///
    /// Returns the number of rows changed: zero when the member is missing
    /// or nothing differs from what is stored.
    async fn update(&mut self, member: &Member) -> Result<u64, DomainError>;

    async fn commit(&mut self) -> Result<(), DomainError>;

    async fn rollback(&mut self) -> Result<(), DomainError>;
}

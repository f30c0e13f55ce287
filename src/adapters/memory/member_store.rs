//! In-Memory Member Store Adapter
//!
//! Keeps members in a shared table. A unit of work edits a private copy of
//! the table that replaces the shared one on commit.
//! Useful for testing and local runs without a database.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, MemberId};
use crate::domain::membership::{Member, NewMember, RenewalToken};
use crate::ports::{MemberStore, MemberUnitOfWork};

#[derive(Debug, Clone, Default)]
struct MemberTable {
    members: Vec<Member>,
    last_id: i64,
}

impl MemberTable {
    fn login_taken(&self, login: &str, except: Option<MemberId>) -> bool {
        self.members
            .iter()
            .any(|m| m.login() == Some(login) && Some(m.id) != except)
    }
}

/// In-memory member store
#[derive(Debug, Clone, Default)]
pub struct InMemoryMemberStore {
    table: Arc<RwLock<MemberTable>>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with existing members; new ids continue after the
    /// highest seeded id.
    pub fn with_members(members: Vec<Member>) -> Self {
        let last_id = members.iter().map(|m| m.id.as_i64()).max().unwrap_or(0);
        Self {
            table: Arc::new(RwLock::new(MemberTable { members, last_id })),
        }
    }

    /// Snapshot of all committed members, in insertion order.
    pub async fn members(&self) -> Vec<Member> {
        self.table.read().await.members.clone()
    }

    pub async fn member_count(&self) -> usize {
        self.table.read().await.members.len()
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn begin(&self) -> Result<Box<dyn MemberUnitOfWork>, DomainError> {
        let staged = self.table.read().await.clone();
        Ok(Box::new(InMemoryUnitOfWork {
            table: Arc::clone(&self.table),
            staged: Some(staged),
        }))
    }

    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, DomainError> {
        let table = self.table.read().await;
        Ok(table.members.iter().find(|m| m.id == id).cloned())
    }

    async fn find_latest_by_email(
        &self,
        email: &str,
        entity: i32,
    ) -> Result<Option<Member>, DomainError> {
        let table = self.table.read().await;
        Ok(table
            .members
            .iter()
            .filter(|m| m.entity == entity && m.profile.email.as_deref() == Some(email))
            .max_by_key(|m| (m.created_at, m.id.as_i64()))
            .cloned())
    }

    async fn store_renewal_token(
        &self,
        id: MemberId,
        token: &RenewalToken,
    ) -> Result<(), DomainError> {
        let mut table = self.table.write().await;
        let member = table
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::MemberNotFound, format!("Member not found: {}", id))
                    .with_detail("id", id.to_string())
            })?;
        member.renewal_token = Some(token.clone());
        Ok(())
    }
}

/// Unit of work over a private copy of the member table.
pub struct InMemoryUnitOfWork {
    table: Arc<RwLock<MemberTable>>,
    staged: Option<MemberTable>,
}

impl InMemoryUnitOfWork {
    fn staged(&mut self) -> Result<&mut MemberTable, DomainError> {
        self.staged.as_mut().ok_or_else(|| {
            DomainError::new(ErrorCode::DatabaseError, "Transaction already finished")
        })
    }
}

#[async_trait]
impl MemberUnitOfWork for InMemoryUnitOfWork {
    async fn login_exists(
        &mut self,
        login: &str,
        except: Option<MemberId>,
    ) -> Result<bool, DomainError> {
        Ok(self.staged()?.login_taken(login, except))
    }

    async fn insert(&mut self, member: &NewMember) -> Result<MemberId, DomainError> {
        let staged = self.staged()?;
        if let Some(login) = member.credentials.as_ref().map(|c| c.login.as_str()) {
            if staged.login_taken(login, None) {
                return Err(DomainError::new(
                    ErrorCode::LoginAlreadyExists,
                    format!("Login {} is already used", login),
                )
                .with_detail("login", login));
            }
        }

        let id = MemberId::new(staged.last_id + 1)?;
        staged.last_id = id.as_i64();
        staged.members.push(member.clone().into_member(id));
        Ok(id)
    }

    async fn update(&mut self, member: &Member) -> Result<u64, DomainError> {
        let staged = self.staged()?;
        match staged.members.iter_mut().find(|m| m.id == member.id) {
            Some(stored) if stored.same_content_as(member) => Ok(0),
            Some(stored) => {
                stored.nature = member.nature;
                stored.profile = member.profile.clone();
                stored.credentials = member.credentials.clone();
                stored.amount = member.amount;
                stored.updated_at = member.updated_at;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        let staged = self.staged.take().ok_or_else(|| {
            DomainError::new(ErrorCode::DatabaseError, "Transaction already finished")
        })?;
        *self.table.write().await = staged;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DomainError> {
        self.staged = None;
        Ok(())
    }
}

//! In-Memory Membership Type Reader
//!
//! Serves a fixed list of membership types.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, MembershipTypeId};
use crate::domain::membership::MembershipType;
use crate::ports::MembershipTypeReader;

#[derive(Debug, Clone, Default)]
pub struct InMemoryMembershipTypeReader {
    types: Arc<RwLock<Vec<MembershipType>>>,
}

impl InMemoryMembershipTypeReader {
    pub fn new(types: Vec<MembershipType>) -> Self {
        Self {
            types: Arc::new(RwLock::new(types)),
        }
    }

    pub async fn add(&self, membership_type: MembershipType) {
        self.types.write().await.push(membership_type);
    }
}

#[async_trait]
impl MembershipTypeReader for InMemoryMembershipTypeReader {
    async fn find_by_id(
        &self,
        id: MembershipTypeId,
        entity: i32,
    ) -> Result<Option<MembershipType>, DomainError> {
        let types = self.types.read().await;
        Ok(types
            .iter()
            .find(|t| t.id == id && t.entity == entity)
            .cloned())
    }

    async fn list_open(&self, entity: i32) -> Result<Vec<MembershipType>, DomainError> {
        let types = self.types.read().await;
        let mut open: Vec<MembershipType> = types
            .iter()
            .filter(|t| t.open && t.entity == entity)
            .cloned()
            .collect();
        open.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::fixtures::membership_type;

    #[tokio::test]
    async fn list_open_skips_closed_types_and_sorts_by_label() {
        let mut closed = membership_type(1);
        closed.open = false;
        let mut senior = membership_type(2);
        senior.label = "Senior".to_string();
        let mut junior = membership_type(3);
        junior.label = "Junior".to_string();
        let reader = InMemoryMembershipTypeReader::new(vec![closed, senior, junior]);

        let labels: Vec<String> = reader
            .list_open(1)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.label)
            .collect();

        assert_eq!(labels, vec!["Junior".to_string(), "Senior".to_string()]);
    }

    #[tokio::test]
    async fn find_by_id_is_scoped_to_entity() {
        let reader = InMemoryMembershipTypeReader::new(vec![membership_type(4)]);
        let id = MembershipTypeId::new(4).unwrap();

        assert!(reader.find_by_id(id, 1).await.unwrap().is_some());
        assert!(reader.find_by_id(id, 2).await.unwrap().is_none());
    }
}

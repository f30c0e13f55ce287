//! ListMembershipTypesHandler - Query handler for the public type table.

use std::sync::Arc;

use crate::domain::membership::{MembershipError, MembershipType};
use crate::ports::MembershipTypeReader;

/// Query for the membership types offered publicly.
#[derive(Debug, Clone, Copy)]
pub struct ListMembershipTypesQuery {
    pub entity: i32,
}

#[derive(Debug, Clone)]
pub struct ListMembershipTypesResult {
    pub types: Vec<MembershipType>,
}

pub struct ListMembershipTypesHandler {
    reader: Arc<dyn MembershipTypeReader>,
}

impl ListMembershipTypesHandler {
    pub fn new(reader: Arc<dyn MembershipTypeReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: ListMembershipTypesQuery,
    ) -> Result<ListMembershipTypesResult, MembershipError> {
        let types = self.reader.list_open(query.entity).await?;
        Ok(ListMembershipTypesResult { types })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMembershipTypeReader;
    use crate::domain::foundation::{DomainError, MembershipTypeId};
    use crate::domain::membership::fixtures::membership_type;
    use async_trait::async_trait;

    struct FailingReader;

    #[async_trait]
    impl MembershipTypeReader for FailingReader {
        async fn find_by_id(
            &self,
            _id: MembershipTypeId,
            _entity: i32,
        ) -> Result<Option<MembershipType>, DomainError> {
            Ok(None)
        }

        async fn list_open(&self, _entity: i32) -> Result<Vec<MembershipType>, DomainError> {
            Err(DomainError::database("Failed to list membership types: timeout"))
        }
    }

    #[tokio::test]
    async fn returns_open_types() {
        let mut closed = membership_type(2);
        closed.open = false;
        let handler = ListMembershipTypesHandler::new(Arc::new(
            InMemoryMembershipTypeReader::new(vec![membership_type(1), closed]),
        ));

        let result = handler
            .handle(ListMembershipTypesQuery { entity: 1 })
            .await
            .unwrap();

        assert_eq!(result.types.len(), 1);
        assert_eq!(result.types[0].id.as_i64(), 1);
    }

    #[tokio::test]
    async fn reader_failure_is_infrastructure_error() {
        let handler = ListMembershipTypesHandler::new(Arc::new(FailingReader));

        let result = handler.handle(ListMembershipTypesQuery { entity: 1 }).await;

        assert!(matches!(result, Err(MembershipError::Infrastructure(_))));
    }
}

//! PostgreSQL implementation of MembershipTypeReader.

use crate::domain::foundation::{DomainError, ErrorCode, MembershipTypeId, Money};
use crate::domain::membership::{LegalNature, MemberStatus, MembershipDuration, MembershipType};
use crate::ports::MembershipTypeReader;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresMembershipTypeReader {
    pool: PgPool,
}

impl PostgresMembershipTypeReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipTypeRow {
    id: i64,
    entity: i32,
    label: String,
    amount_cents: Option<i64>,
    can_edit_amount: bool,
    subscription_required: bool,
    vote_allowed: bool,
    nature: Option<String>,
    duration: Option<String>,
    open: bool,
    mail_on_valid: Option<String>,
    member_count: i64,
}

impl TryFrom<MembershipTypeRow> for MembershipType {
    type Error = DomainError;

    fn try_from(row: MembershipTypeRow) -> Result<Self, Self::Error> {
        let invalid = |column: &str, e: &dyn std::fmt::Display| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid {} value: {}", column, e),
            )
        };

        let nature = row
            .nature
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .map(str::parse::<LegalNature>)
            .transpose()
            .map_err(|e| invalid("nature", &e))?;
        let duration = row
            .duration
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(str::parse::<MembershipDuration>)
            .transpose()
            .map_err(|e| invalid("duration", &e))?;

        Ok(MembershipType {
            id: MembershipTypeId::new(row.id).map_err(|e| invalid("id", &e))?,
            entity: row.entity,
            label: row.label,
            amount: row
                .amount_cents
                .map(Money::from_cents)
                .transpose()
                .map_err(|e| invalid("amount_cents", &e))?,
            can_edit_amount: row.can_edit_amount,
            subscription_required: row.subscription_required,
            vote_allowed: row.vote_allowed,
            nature,
            duration,
            open: row.open,
            mail_on_valid: row.mail_on_valid,
            member_count: row.member_count,
        })
    }
}

const TYPE_SELECT: &str = r#"
    SELECT t.id, t.entity, t.label, t.amount_cents, t.can_edit_amount,
           t.subscription_required, t.vote_allowed, t.nature, t.duration, t.open,
           t.mail_on_valid,
           (SELECT COUNT(*) FROM members m
             WHERE m.type_id = t.id AND m.status = $2) AS member_count
    FROM membership_types t
"#;

#[async_trait]
impl MembershipTypeReader for PostgresMembershipTypeReader {
    async fn find_by_id(
        &self,
        id: MembershipTypeId,
        entity: i32,
    ) -> Result<Option<MembershipType>, DomainError> {
        let row: Option<MembershipTypeRow> = sqlx::query_as(&format!(
            "{} WHERE t.id = $1 AND t.entity = $3",
            TYPE_SELECT
        ))
        .bind(id.as_i64())
        .bind(MemberStatus::Active.code())
        .bind(entity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find membership type: {}", e),
            )
        })?;

        row.map(MembershipType::try_from).transpose()
    }

    async fn list_open(&self, entity: i32) -> Result<Vec<MembershipType>, DomainError> {
        let rows: Vec<MembershipTypeRow> = sqlx::query_as(&format!(
            "{} WHERE t.entity = $1 AND t.open ORDER BY t.label ASC",
            TYPE_SELECT
        ))
        .bind(entity)
        .bind(MemberStatus::Active.code())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list membership types: {}", e),
            )
        })?;

        rows.into_iter().map(MembershipType::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::DurationUnit;

    fn row() -> MembershipTypeRow {
        MembershipTypeRow {
            id: 3,
            entity: 1,
            label: "Senior".to_string(),
            amount_cents: Some(2000),
            can_edit_amount: false,
            subscription_required: true,
            vote_allowed: true,
            nature: Some("mor".to_string()),
            duration: Some("6m".to_string()),
            open: true,
            mail_on_valid: None,
            member_count: 4,
        }
    }

    #[test]
    fn row_converts_to_membership_type() {
        let ty = MembershipType::try_from(row()).unwrap();

        assert_eq!(ty.id.as_i64(), 3);
        assert_eq!(ty.nature, Some(LegalNature::Organization));
        assert_eq!(ty.duration, Some(MembershipDuration::new(6, DurationUnit::Month)));
        assert_eq!(ty.member_count, 4);
    }

    #[test]
    fn blank_nature_and_duration_mean_unrestricted() {
        let mut blank = row();
        blank.nature = Some(String::new());
        blank.duration = None;

        let ty = MembershipType::try_from(blank).unwrap();

        assert_eq!(ty.nature, None);
        assert_eq!(ty.duration, None);
    }

    #[test]
    fn bad_duration_is_database_error() {
        let mut bad = row();
        bad.duration = Some("forever".to_string());

        let err = MembershipType::try_from(bad).unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("duration"));
    }
}

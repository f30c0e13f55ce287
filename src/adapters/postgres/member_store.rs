//! PostgreSQL implementation of MemberStore.
//!
//! Submissions run inside a database transaction held by
//! `PostgresUnitOfWork`; lookups and renewal tokens use the pool directly.

use crate::domain::foundation::{DomainError, ErrorCode, MemberId, MembershipTypeId, Money, Timestamp};
use crate::domain::membership::{
    LegalNature, Member, MemberCredentials, MemberProfile, MemberStatus, NewMember,
    PasswordHash, RenewalToken,
};
use crate::ports::{MemberStore, MemberUnitOfWork};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

/// PostgreSQL implementation of the MemberStore port.
pub struct PostgresMemberStore {
    pool: PgPool,
}

impl PostgresMemberStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MEMBER_COLUMNS: &str = r#"
    id, entity, status, type_id, nature, civility, firstname, lastname, gender,
    company, address, zip, town, country_code, state_id, email, birth, photo,
    public, note_private, budget, login, password_hash, amount_cents, end_date,
    renewal_token, renewal_token_expires_at, created_at, updated_at
"#;

/// Database row representation of a member.
#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: i64,
    entity: i32,
    status: i16,
    type_id: i64,
    nature: String,
    civility: Option<String>,
    firstname: String,
    lastname: String,
    gender: Option<String>,
    company: Option<String>,
    address: Option<String>,
    zip: Option<String>,
    town: Option<String>,
    country_code: Option<String>,
    state_id: Option<i32>,
    email: Option<String>,
    birth: Option<NaiveDateTime>,
    photo: Option<String>,
    public: bool,
    note_private: Option<String>,
    budget: Option<i64>,
    login: Option<String>,
    password_hash: Option<String>,
    amount_cents: Option<i64>,
    end_date: Option<DateTime<Utc>>,
    renewal_token: Option<String>,
    renewal_token_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn corrupt(column: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} value: {}", column, err),
    )
}

impl TryFrom<MemberRow> for Member {
    type Error = DomainError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        let nature: LegalNature = row.nature.parse().map_err(|e| corrupt("nature", e))?;
        let status = MemberStatus::from_code(row.status).map_err(|e| corrupt("status", e))?;

        let credentials = match row.login {
            Some(login) => Some(MemberCredentials {
                login,
                password_hash: row
                    .password_hash
                    .map(PasswordHash::from_stored)
                    .transpose()
                    .map_err(|e| corrupt("password_hash", e))?,
            }),
            None => None,
        };

        let renewal_token = match (row.renewal_token, row.renewal_token_expires_at) {
            (Some(value), Some(expires_at)) => Some(
                RenewalToken::from_parts(value, Timestamp::from_datetime(expires_at))
                    .map_err(|e| corrupt("renewal_token", e))?,
            ),
            _ => None,
        };

        Ok(Member {
            id: MemberId::new(row.id).map_err(|e| corrupt("id", e))?,
            entity: row.entity,
            status,
            type_id: MembershipTypeId::new(row.type_id).map_err(|e| corrupt("type_id", e))?,
            nature,
            profile: MemberProfile {
                civility: row.civility,
                firstname: row.firstname,
                lastname: row.lastname,
                gender: row.gender,
                company: row.company,
                address: row.address,
                zip: row.zip,
                town: row.town,
                country_code: row.country_code,
                state_id: row.state_id,
                email: row.email,
                birth: row.birth,
                photo: row.photo,
                public: row.public,
                note_private: row.note_private,
                budget: row.budget,
            },
            credentials,
            amount: row
                .amount_cents
                .map(Money::from_cents)
                .transpose()
                .map_err(|e| corrupt("amount_cents", e))?,
            end_date: row.end_date.map(Timestamp::from_datetime),
            renewal_token,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl MemberStore for PostgresMemberStore {
    async fn begin(&self) -> Result<Box<dyn MemberUnitOfWork>, DomainError> {
        let tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to begin transaction: {}", e))
        })?;
        Ok(Box::new(PostgresUnitOfWork { tx: Some(tx) }))
    }

    async fn find_by_id(&self, id: MemberId) -> Result<Option<Member>, DomainError> {
        let row: Option<MemberRow> =
            sqlx::query_as(&format!("SELECT {} FROM members WHERE id = $1", MEMBER_COLUMNS))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Failed to find member: {}", e))
                })?;

        row.map(Member::try_from).transpose()
    }

    async fn find_latest_by_email(
        &self,
        email: &str,
        entity: i32,
    ) -> Result<Option<Member>, DomainError> {
        let row: Option<MemberRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM members
            WHERE email = $1 AND entity = $2
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
            MEMBER_COLUMNS
        ))
        .bind(email)
        .bind(entity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find member: {}", e))
        })?;

        row.map(Member::try_from).transpose()
    }

    async fn store_renewal_token(
        &self,
        id: MemberId,
        token: &RenewalToken,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE members SET renewal_token = $2, renewal_token_expires_at = $3
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(token.value())
        .bind(*token.expires_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to store renewal token: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::MemberNotFound,
                format!("Member not found: {}", id),
            )
            .with_detail("id", id.to_string()));
        }

        Ok(())
    }
}

/// One submission's database transaction.
///
/// Dropping it before `commit` rolls the transaction back.
pub struct PostgresUnitOfWork {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PostgresUnitOfWork {
    fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>, DomainError> {
        self.tx.as_mut().ok_or_else(|| {
            DomainError::new(ErrorCode::DatabaseError, "Transaction already finished")
        })
    }
}

fn login_error(e: sqlx::Error, login: Option<&str>, action: &str) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.constraint() == Some("members_login_key") {
            let login = login.unwrap_or_default();
            return DomainError::new(
                ErrorCode::LoginAlreadyExists,
                format!("Login {} is already used", login),
            )
            .with_detail("login", login);
        }
    }
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to {} member: {}", action, e))
}

#[async_trait]
impl MemberUnitOfWork for PostgresUnitOfWork {
    async fn login_exists(
        &mut self,
        login: &str,
        except: Option<MemberId>,
    ) -> Result<bool, DomainError> {
        let tx = self.tx()?;
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM members
                WHERE login = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(login)
        .bind(except.map(|id| id.as_i64()))
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to check login: {}", e))
        })?;

        Ok(exists)
    }

    async fn insert(&mut self, member: &NewMember) -> Result<MemberId, DomainError> {
        let tx = self.tx()?;
        let profile = &member.profile;
        let login = member.credentials.as_ref().map(|c| c.login.as_str());
        let password_hash = member
            .credentials
            .as_ref()
            .and_then(|c| c.password_hash.as_ref())
            .map(|h| h.as_str());

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO members (
                entity, status, type_id, nature, civility, firstname, lastname, gender,
                company, address, zip, town, country_code, state_id, email, birth, photo,
                public, note_private, budget, login, password_hash, amount_cents, end_date,
                created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22, $23, $24, $25, $25
            )
            RETURNING id
            "#,
        )
        .bind(member.entity)
        .bind(member.status.code())
        .bind(member.type_id.as_i64())
        .bind(member.nature.code())
        .bind(&profile.civility)
        .bind(&profile.firstname)
        .bind(&profile.lastname)
        .bind(&profile.gender)
        .bind(&profile.company)
        .bind(&profile.address)
        .bind(&profile.zip)
        .bind(&profile.town)
        .bind(&profile.country_code)
        .bind(profile.state_id)
        .bind(&profile.email)
        .bind(profile.birth)
        .bind(&profile.photo)
        .bind(profile.public)
        .bind(&profile.note_private)
        .bind(profile.budget)
        .bind(login)
        .bind(password_hash)
        .bind(member.amount.map(|a| a.cents()))
        .bind(member.end_date.map(|d| *d.as_datetime()))
        .bind(member.created_at.as_datetime())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| login_error(e, login, "insert"))?;

        MemberId::new(id).map_err(DomainError::from)
    }

    async fn update(&mut self, member: &Member) -> Result<u64, DomainError> {
        let tx = self.tx()?;
        let profile = &member.profile;
        let login = member.login();
        let password_hash = member
            .credentials
            .as_ref()
            .and_then(|c| c.password_hash.as_ref())
            .map(|h| h.as_str());

        // Rows whose editable columns already hold these values are not
        // touched, so zero rows affected means nothing to do.
        let result = sqlx::query(
            r#"
            UPDATE members SET
                nature = $2, civility = $3, firstname = $4, lastname = $5, gender = $6,
                company = $7, address = $8, zip = $9, town = $10, country_code = $11,
                state_id = $12, email = $13, birth = $14, photo = $15, public = $16,
                note_private = $17, budget = $18, login = $19, password_hash = $20,
                amount_cents = $21, updated_at = $22
            WHERE id = $1
              AND (nature, civility, firstname, lastname, gender, company, address, zip,
                   town, country_code, state_id, email, birth, photo, public, note_private,
                   budget, login, password_hash, amount_cents)
                  IS DISTINCT FROM
                  ($2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                   $18, $19, $20, $21)
            "#,
        )
        .bind(member.id.as_i64())
        .bind(member.nature.code())
        .bind(&profile.civility)
        .bind(&profile.firstname)
        .bind(&profile.lastname)
        .bind(&profile.gender)
        .bind(&profile.company)
        .bind(&profile.address)
        .bind(&profile.zip)
        .bind(&profile.town)
        .bind(&profile.country_code)
        .bind(profile.state_id)
        .bind(&profile.email)
        .bind(profile.birth)
        .bind(&profile.photo)
        .bind(profile.public)
        .bind(&profile.note_private)
        .bind(profile.budget)
        .bind(login)
        .bind(password_hash)
        .bind(member.amount.map(|a| a.cents()))
        .bind(member.updated_at.as_datetime())
        .execute(&mut **tx)
        .await
        .map_err(|e| login_error(e, login, "update"))?;

        Ok(result.rows_affected())
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        let tx = self.tx.take().ok_or_else(|| {
            DomainError::new(ErrorCode::DatabaseError, "Transaction already finished")
        })?;
        tx.commit().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to commit transaction: {}", e))
        })
    }

    async fn rollback(&mut self) -> Result<(), DomainError> {
        match self.tx.take() {
            Some(tx) => tx.rollback().await.map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to roll back transaction: {}", e),
                )
            }),
            None => Ok(()),
        }
    }
}

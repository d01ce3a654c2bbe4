//! Policy repository implementation
//!
//! Row-level access to the `policies` and `policy_components` tables. Every
//! method is a single statement; callers sequence multi-step flows.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

/// A row of the `policies` table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PolicyRow {
    pub id: Uuid,
    pub policy_number: i64,
    pub name: String,
}

/// A row of the `policy_components` table
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ComponentRow {
    pub id: Uuid,
    pub policy_id: Uuid,
    pub sequence: i32,
    pub name: String,
    pub operation: String,
    pub flat_value: Decimal,
    pub percentage: Decimal,
}

/// Values for inserting a component row
#[derive(Debug, Clone)]
pub struct NewComponentRow {
    pub id: Uuid,
    pub policy_id: Uuid,
    pub sequence: i32,
    pub name: String,
    pub operation: String,
    pub flat_value: Decimal,
    pub percentage: Decimal,
}

/// Repository for policy and component rows
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::repositories::PolicyRepository;
///
/// let repo = PolicyRepository::new(pool);
/// let policy = repo.find_by_number(42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    pool: PgPool,
}

impl PolicyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds a policy row by its human-facing number
    pub async fn find_by_number(&self, policy_number: i64) -> Result<Option<PolicyRow>, DatabaseError> {
        let row = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT id, policy_number, name
            FROM policies
            WHERE policy_number = $1
            "#,
        )
        .bind(policy_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Lists policy rows ordered by policy number
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<PolicyRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT id, policy_number, name
            FROM policies
            ORDER BY policy_number
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Loads the components of several policies in one query
    pub async fn components_for(&self, policy_ids: &[Uuid]) -> Result<Vec<ComponentRow>, DatabaseError> {
        if policy_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ComponentRow>(
            r#"
            SELECT id, policy_id, sequence, name, operation, flat_value, percentage
            FROM policy_components
            WHERE policy_id = ANY($1)
            ORDER BY policy_id, sequence
            "#,
        )
        .bind(policy_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Inserts a policy row
    ///
    /// # Errors
    ///
    /// `DatabaseError::DuplicateEntry` if the number is already used
    pub async fn insert_policy(&self, id: Uuid, policy_number: i64, name: &str) -> Result<PolicyRow, DatabaseError> {
        let row = sqlx::query_as::<_, PolicyRow>(
            r#"
            INSERT INTO policies (id, policy_number, name)
            VALUES ($1, $2, $3)
            RETURNING id, policy_number, name
            "#,
        )
        .bind(id)
        .bind(policy_number)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Inserts a component row
    pub async fn insert_component(&self, component: NewComponentRow) -> Result<ComponentRow, DatabaseError> {
        let row = sqlx::query_as::<_, ComponentRow>(
            r#"
            INSERT INTO policy_components
                (id, policy_id, sequence, name, operation, flat_value, percentage)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, policy_id, sequence, name, operation, flat_value, percentage
            "#,
        )
        .bind(component.id)
        .bind(component.policy_id)
        .bind(component.sequence)
        .bind(&component.name)
        .bind(&component.operation)
        .bind(component.flat_value)
        .bind(component.percentage)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Overwrites both value columns of one component
    ///
    /// Rows whose values already match are left untouched, so the returned
    /// count is the number of rows that actually changed.
    pub async fn update_component_values(
        &self,
        policy_id: Uuid,
        sequence: i32,
        flat_value: Decimal,
        percentage: Decimal,
    ) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE policy_components
            SET flat_value = $3, percentage = $4, updated_at = now()
            WHERE policy_id = $1
              AND sequence = $2
              AND (flat_value <> $3 OR percentage <> $4)
            "#,
        )
        .bind(policy_id)
        .bind(sequence)
        .bind(flat_value)
        .bind(percentage)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Renames a policy; returns the number of rows that changed
    pub async fn update_name(&self, policy_number: i64, name: &str) -> Result<u64, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE policies
            SET name = $2, updated_at = now()
            WHERE policy_number = $1 AND name <> $2
            "#,
        )
        .bind(policy_number)
        .bind(name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes all components of a policy
    pub async fn delete_components(&self, policy_id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM policy_components WHERE policy_id = $1")
            .bind(policy_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes a policy row by number
    pub async fn delete_policy(&self, policy_number: i64) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM policies WHERE policy_number = $1")
            .bind(policy_number)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

//! PostgreSQL Policy Adapter
//!
//! Implements `PolicyStore` on top of `PolicyRepository`. Stored rows are
//! mapped back into domain values here; a row with an unknown operation or an
//! out-of-range sequence is reported as a transformation failure.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    ComponentId, DomainPort, HealthCheckResult, HealthCheckable, PageRequest, PolicyId,
    PolicyNumber, PortError,
};
use domain_policy::{
    ComponentValue, NewPolicy, NewPolicyComponent, Operation, PolicyAggregate, PolicyComponent,
    PolicyRecord, PolicyStore, Sequence,
};

use crate::error::DatabaseError;
use crate::repositories::policy::{ComponentRow, NewComponentRow, PolicyRepository, PolicyRow};

const ADAPTER_ID: &str = "postgres-policy-store";

/// PostgreSQL-backed implementation of `PolicyStore`
#[derive(Debug, Clone)]
pub struct PostgresPolicyStore {
    repository: PolicyRepository,
    pool: PgPool,
}

impl PostgresPolicyStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PolicyRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &PolicyRepository {
        &self.repository
    }

    async fn aggregates(&self, rows: Vec<PolicyRow>) -> Result<Vec<PolicyAggregate>, PortError> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut by_policy: HashMap<Uuid, Vec<PolicyComponent>> = HashMap::new();
        for row in self.repository.components_for(&ids).await? {
            let policy_id = row.policy_id;
            by_policy.entry(policy_id).or_default().push(row_to_component(row)?);
        }

        rows.into_iter()
            .map(|row| {
                let components = by_policy.remove(&row.id).unwrap_or_default();
                Ok(PolicyAggregate::new(row_to_record(row)?, components))
            })
            .collect()
    }
}

impl DomainPort for PostgresPolicyStore {}

#[async_trait]
impl HealthCheckable for PostgresPolicyStore {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, ADAPTER_ID).await
    }
}

#[async_trait]
impl PolicyStore for PostgresPolicyStore {
    #[instrument(skip(self), fields(policy_number = %number))]
    async fn get_by_number(&self, number: PolicyNumber) -> Result<Option<PolicyAggregate>, PortError> {
        let Some(row) = self.repository.find_by_number(number.value()).await? else {
            debug!("Policy row not found");
            return Ok(None);
        };
        Ok(self.aggregates(vec![row]).await?.pop())
    }

    #[instrument(skip(self), fields(page = page.page(), size = page.size()))]
    async fn list(&self, page: PageRequest) -> Result<Vec<PolicyAggregate>, PortError> {
        let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let rows = self.repository.list(limit, offset).await?;
        debug!(count = rows.len(), "Listed policy rows");
        self.aggregates(rows).await
    }

    #[instrument(skip(self, policy), fields(policy_number = %policy.policy_number))]
    async fn create_policy(&self, policy: NewPolicy) -> Result<PolicyRecord, PortError> {
        let row = self
            .repository
            .insert_policy(Uuid::now_v7(), policy.policy_number.value(), &policy.name)
            .await?;
        row_to_record(row)
    }

    #[instrument(skip(self, component), fields(policy_id = %component.policy_id, sequence = %component.sequence))]
    async fn create_component(&self, component: NewPolicyComponent) -> Result<PolicyComponent, PortError> {
        let row = self
            .repository
            .insert_component(NewComponentRow {
                id: Uuid::now_v7(),
                policy_id: *component.policy_id.as_uuid(),
                sequence: component.sequence.value(),
                name: component.name,
                operation: component.operation.as_str().to_string(),
                flat_value: component.flat_value,
                percentage: component.percentage,
            })
            .await?;
        row_to_component(row)
    }

    #[instrument(skip(self), fields(policy_id = %policy_id, sequence = %sequence))]
    async fn update_component_value(
        &self,
        policy_id: PolicyId,
        sequence: Sequence,
        value: ComponentValue,
    ) -> Result<bool, PortError> {
        let (flat_value, percentage) = value.as_columns();
        let changed = self
            .repository
            .update_component_values(*policy_id.as_uuid(), sequence.value(), flat_value, percentage)
            .await?;
        Ok(changed > 0)
    }

    #[instrument(skip(self, name), fields(policy_number = %number))]
    async fn update_policy_name(&self, number: PolicyNumber, name: &str) -> Result<bool, PortError> {
        Ok(self.repository.update_name(number.value(), name).await? > 0)
    }

    #[instrument(skip(self), fields(policy_id = %policy_id))]
    async fn delete_components(&self, policy_id: PolicyId) -> Result<u64, PortError> {
        Ok(self.repository.delete_components(*policy_id.as_uuid()).await?)
    }

    #[instrument(skip(self), fields(policy_number = %number))]
    async fn delete_policy(&self, number: PolicyNumber) -> Result<bool, PortError> {
        Ok(self.repository.delete_policy(number.value()).await? > 0)
    }
}

fn row_to_record(row: PolicyRow) -> Result<PolicyRecord, PortError> {
    let policy_number = PolicyNumber::new(row.policy_number)
        .map_err(|e| DatabaseError::invalid_row(format!("policy {}: {}", row.id, e)))?;

    Ok(PolicyRecord {
        id: PolicyId::from_uuid(row.id),
        policy_number,
        name: row.name,
    })
}

fn row_to_component(row: ComponentRow) -> Result<PolicyComponent, PortError> {
    let sequence = Sequence::new(row.sequence)
        .map_err(|e| DatabaseError::invalid_row(format!("component {}: {}", row.id, e)))?;
    let operation = Operation::from_str(&row.operation)
        .map_err(|e| DatabaseError::invalid_row(format!("component {}: {}", row.id, e)))?;

    Ok(PolicyComponent {
        id: ComponentId::from_uuid(row.id),
        policy_id: PolicyId::from_uuid(row.policy_id),
        sequence,
        name: row.name,
        operation,
        flat_value: row.flat_value.normalize(),
        percentage: row.percentage.normalize(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn component_row(sequence: i32, operation: &str) -> ComponentRow {
        ComponentRow {
            id: Uuid::new_v4(),
            policy_id: Uuid::new_v4(),
            sequence,
            name: "Premium Base".to_string(),
            operation: operation.to_string(),
            flat_value: dec!(100.0000),
            percentage: dec!(0.0000),
        }
    }

    #[test]
    fn test_row_to_component_normalizes_scale() {
        let component = row_to_component(component_row(1, "add")).unwrap();
        assert_eq!(component.flat_value.to_string(), "100");
        assert_eq!(component.operation, Operation::Add);
    }

    #[test]
    fn test_unknown_operation_is_transformation_error() {
        let err = row_to_component(component_row(1, "multiply")).unwrap_err();
        assert!(matches!(err, PortError::Transformation { .. }));
    }

    #[test]
    fn test_out_of_range_sequence_is_transformation_error() {
        let err = row_to_component(component_row(7, "add")).unwrap_err();
        assert!(matches!(err, PortError::Transformation { .. }));
    }

    #[test]
    fn test_non_positive_number_is_transformation_error() {
        let row = PolicyRow {
            id: Uuid::new_v4(),
            policy_number: 0,
            name: "Broken".to_string(),
        };
        assert!(matches!(row_to_record(row), Err(PortError::Transformation { .. })));
    }
}

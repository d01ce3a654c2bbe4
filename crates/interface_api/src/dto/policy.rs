//! Policy DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use core_kernel::Page;
use domain_policy::{
    ComponentInput, CreatePolicyCommand, PolicyAggregate, PolicyComponent, PolicyDeletion,
    PremiumQuote, UpdatePolicyCommand,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePolicyRequest {
    #[validate(range(min = 1, message = "Policy number must be greater than 0"))]
    pub policy_number: i64,
    #[validate(length(min = 1, max = 200, message = "Policy name must be 1 to 200 characters"))]
    pub name: String,
    pub components: Vec<ComponentInput>,
}

impl From<CreatePolicyRequest> for CreatePolicyCommand {
    fn from(request: CreatePolicyRequest) -> Self {
        CreatePolicyCommand {
            policy_number: request.policy_number,
            name: request.name,
            components: request.components,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePolicyRequest {
    #[validate(length(min = 1, max = 200, message = "Policy name must be 1 to 200 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentInput>,
}

impl From<UpdatePolicyRequest> for UpdatePolicyCommand {
    fn from(request: UpdatePolicyRequest) -> Self {
        UpdatePolicyCommand {
            name: request.name,
            components: request.components,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuoteRequest {
    #[validate(range(min = 1, message = "Policy number must be greater than 0"))]
    pub policy_number: i64,
    pub market_value: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPoliciesQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentResponse {
    pub id: Uuid,
    pub sequence: i32,
    pub name: String,
    pub operation: String,
    pub flat_value: Decimal,
    pub percentage: Decimal,
}

impl From<PolicyComponent> for ComponentResponse {
    fn from(component: PolicyComponent) -> Self {
        Self {
            id: *component.id.as_uuid(),
            sequence: component.sequence.value(),
            name: component.name,
            operation: component.operation.to_string(),
            flat_value: component.flat_value,
            percentage: component.percentage,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResponse {
    pub id: Uuid,
    pub policy_number: i64,
    pub name: String,
    pub components: Vec<ComponentResponse>,
}

impl From<PolicyAggregate> for PolicyResponse {
    fn from(aggregate: PolicyAggregate) -> Self {
        Self {
            id: *aggregate.policy.id.as_uuid(),
            policy_number: aggregate.policy.policy_number.value(),
            name: aggregate.policy.name,
            components: aggregate.components.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyPageResponse {
    pub page_number: u32,
    pub page_size: u32,
    pub data: Vec<PolicyResponse>,
}

impl From<Page<PolicyAggregate>> for PolicyPageResponse {
    fn from(page: Page<PolicyAggregate>) -> Self {
        Self {
            page_number: page.page_number,
            page_size: page.page_size,
            data: page.data.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub policy_id: Uuid,
    pub policy_name: String,
    pub premium: Decimal,
}

impl From<PremiumQuote> for QuoteResponse {
    fn from(quote: PremiumQuote) -> Self {
        Self {
            policy_id: *quote.policy_id.as_uuid(),
            policy_name: quote.policy_name,
            premium: quote.premium,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePolicyResponse {
    pub policy_number: i64,
    pub components_deleted: u64,
}

impl From<PolicyDeletion> for DeletePolicyResponse {
    fn from(deletion: PolicyDeletion) -> Self {
        Self {
            policy_number: deletion.policy_number.value(),
            components_deleted: deletion.components_deleted,
        }
    }
}

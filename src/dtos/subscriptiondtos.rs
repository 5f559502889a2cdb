use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::ErrorMessage;
use crate::models::subscriptionmodel::{BillingCycle, Subscription};

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubscriptionDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(custom = "validate_cost")]
    pub cost: BigDecimal,

    #[validate(custom = "validate_billing_cycle")]
    pub billing_cycle: String,

    pub start_date: NaiveDate,

    pub is_active: Option<bool>,

    pub category: Option<String>,
}

/// Partial update: omitted fields keep their stored values.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateSubscriptionDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,

    #[validate(custom = "validate_cost")]
    pub cost: Option<BigDecimal>,

    #[validate(custom = "validate_billing_cycle")]
    pub billing_cycle: Option<String>,

    pub start_date: Option<NaiveDate>,

    pub is_active: Option<bool>,

    pub category: Option<String>,
}

fn validate_cost(cost: &BigDecimal) -> Result<(), ValidationError> {
    if cost <= &BigDecimal::zero() {
        let mut error = ValidationError::new("cost_not_positive");
        error.message = Some(ErrorMessage::CostNotPositive.to_string().into());
        return Err(error);
    }
    Ok(())
}

fn validate_billing_cycle(billing_cycle: &str) -> Result<(), ValidationError> {
    if BillingCycle::from_str(billing_cycle).is_none() {
        let mut error = ValidationError::new("invalid_billing_cycle");
        error.message = Some(ErrorMessage::InvalidBillingCycle.to_string().into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterSubscriptionDto {
    pub id: String,
    pub name: String,
    pub cost: BigDecimal,
    pub billing_cycle: String,
    pub start_date: NaiveDate,
    pub renewal_date: NaiveDate,
    pub is_active: bool,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FilterSubscriptionDto {
    pub fn filter_subscription(subscription: &Subscription) -> Self {
        FilterSubscriptionDto {
            id: subscription.id.to_string(),
            name: subscription.name.to_owned(),
            cost: subscription.cost.with_scale(2),
            billing_cycle: subscription.billing_cycle.to_str().to_string(),
            start_date: subscription.start_date,
            renewal_date: subscription.renewal_date,
            is_active: subscription.is_active,
            category: subscription.category.to_owned(),
            created_at: subscription.created_at,
            updated_at: subscription.updated_at,
        }
    }

    pub fn filter_subscriptions(subscriptions: &[Subscription]) -> Vec<FilterSubscriptionDto> {
        subscriptions
            .iter()
            .map(FilterSubscriptionDto::filter_subscription)
            .collect()
    }
}

use bigdecimal::rounding::RoundingMode;
use bigdecimal::{BigDecimal, Zero};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::dtos::FilterSubscriptionDto;
use crate::models::subscriptionmodel::{BillingCycle, Subscription};

pub const UPCOMING_RENEWAL_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Serialize)]
pub struct SubscriptionStats {
    pub total_monthly_cost: BigDecimal,
    pub total_yearly_cost: BigDecimal,
    pub active_subscriptions_count: i64,
    pub upcoming_renewals_count: i64,
    pub upcoming_renewals: Vec<FilterSubscriptionDto>,
}

/// Aggregates over the active records the caller fetched; yearly costs are
/// normalized to monthly by dividing by 12 and monthly to yearly by
/// multiplying by 12. Totals are zero, never absent, for an empty slice.
pub fn compute_subscription_stats(
    subscriptions: &[Subscription],
    today: NaiveDate,
) -> SubscriptionStats {
    let twelve = BigDecimal::from(12);
    let mut total_monthly_cost = BigDecimal::zero();
    let mut total_yearly_cost = BigDecimal::zero();

    for subscription in subscriptions {
        match subscription.billing_cycle {
            BillingCycle::Monthly => {
                total_monthly_cost = total_monthly_cost + &subscription.cost;
                total_yearly_cost = total_yearly_cost + &subscription.cost * &twelve;
            }
            BillingCycle::Yearly => {
                total_monthly_cost = total_monthly_cost + &subscription.cost / &twelve;
                total_yearly_cost = total_yearly_cost + &subscription.cost;
            }
        }
    }

    // Renewals due within the next week, both endpoints inclusive.
    let window_end = today + Duration::days(UPCOMING_RENEWAL_WINDOW_DAYS);
    let upcoming: Vec<&Subscription> = subscriptions
        .iter()
        .filter(|s| s.renewal_date >= today && s.renewal_date <= window_end)
        .collect();

    SubscriptionStats {
        total_monthly_cost: total_monthly_cost.with_scale_round(2, RoundingMode::HalfUp),
        total_yearly_cost: total_yearly_cost.with_scale_round(2, RoundingMode::HalfUp),
        active_subscriptions_count: subscriptions.len() as i64,
        upcoming_renewals_count: upcoming.len() as i64,
        upcoming_renewals: upcoming
            .into_iter()
            .map(FilterSubscriptionDto::filter_subscription)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;
    use uuid::Uuid;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn subscription(cost: &str, billing_cycle: BillingCycle, renewal_date: NaiveDate) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            name: "Service".to_string(),
            cost: BigDecimal::from_str(cost).unwrap(),
            billing_cycle,
            start_date: date(2024, 1, 1),
            renewal_date,
            is_active: true,
            category: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn totals_convert_between_cycles() {
        let today = date(2024, 8, 6);
        let subscriptions = vec![
            subscription("10.00", BillingCycle::Monthly, date(2024, 9, 1)),
            subscription("120.00", BillingCycle::Yearly, date(2025, 1, 1)),
        ];

        let stats = compute_subscription_stats(&subscriptions, today);

        assert_eq!(stats.total_monthly_cost.to_string(), "20.00");
        assert_eq!(stats.total_yearly_cost.to_string(), "240.00");
        assert_eq!(stats.active_subscriptions_count, 2);
    }

    #[test]
    fn empty_slice_yields_zeroes_and_empty_list() {
        let stats = compute_subscription_stats(&[], date(2024, 8, 6));

        assert_eq!(stats.total_monthly_cost.to_string(), "0.00");
        assert_eq!(stats.total_yearly_cost.to_string(), "0.00");
        assert_eq!(stats.active_subscriptions_count, 0);
        assert_eq!(stats.upcoming_renewals_count, 0);
        assert!(stats.upcoming_renewals.is_empty());
    }

    #[test]
    fn yearly_cost_rounds_half_up_when_divided() {
        let today = date(2024, 8, 6);
        let subscriptions = vec![subscription("100.00", BillingCycle::Yearly, date(2025, 1, 1))];

        let stats = compute_subscription_stats(&subscriptions, today);

        assert_eq!(stats.total_monthly_cost.to_string(), "8.33");
        assert_eq!(stats.total_yearly_cost.to_string(), "100.00");
    }

    #[test]
    fn upcoming_window_is_inclusive_on_both_ends() {
        let today = date(2024, 8, 6);
        let subscriptions = vec![
            subscription("5.00", BillingCycle::Monthly, today),
            subscription("5.00", BillingCycle::Monthly, today + Duration::days(7)),
            subscription("5.00", BillingCycle::Monthly, today + Duration::days(8)),
        ];

        let stats = compute_subscription_stats(&subscriptions, today);

        assert_eq!(stats.upcoming_renewals_count, 2);
        assert_eq!(stats.upcoming_renewals.len(), 2);
        assert_eq!(stats.active_subscriptions_count, 3);
    }

    #[test]
    fn upcoming_list_carries_full_representations() {
        let today = date(2024, 8, 6);
        let subscriptions = vec![subscription("9.99", BillingCycle::Monthly, date(2024, 8, 10))];

        let stats = compute_subscription_stats(&subscriptions, today);

        assert_eq!(stats.upcoming_renewals[0].cost.to_string(), "9.99");
        assert_eq!(stats.upcoming_renewals[0].billing_cycle, "monthly");
        assert_eq!(stats.upcoming_renewals[0].renewal_date, date(2024, 8, 10));
    }
}

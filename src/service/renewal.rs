use chrono::{Datelike, Months, NaiveDate};

use crate::models::subscriptionmodel::BillingCycle;

/// Smallest renewal date strictly after `today`, reached from `start_date`
/// in whole billing cycles. `None` when there is no start date to step from.
pub fn calculate_next_renewal(
    start_date: Option<NaiveDate>,
    billing_cycle: BillingCycle,
    today: NaiveDate,
) -> Option<NaiveDate> {
    start_date.map(|start_date| next_renewal_date(start_date, billing_cycle, today))
}

pub fn next_renewal_date(
    start_date: NaiveDate,
    billing_cycle: BillingCycle,
    today: NaiveDate,
) -> NaiveDate {
    let step = billing_cycle.months();
    let mut cycles = elapsed_cycles(start_date, today, step);

    loop {
        let candidate = add_months(start_date, cycles * step);
        if candidate > today {
            return candidate;
        }
        cycles += 1;
    }
}

// Closed-form jump over the elapsed cycles; the caller's loop only runs the
// final correction steps, however far in the past the start date lies.
fn elapsed_cycles(start_date: NaiveDate, today: NaiveDate, step: u32) -> u32 {
    let span = (today.year() - start_date.year()) * 12 + today.month() as i32
        - start_date.month() as i32;
    if span <= 0 {
        0
    } else {
        span as u32 / step
    }
}

// Calendar month addition: Jan 31 + 1 month lands on the last day of
// February, not a fixed day count later.
fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn monthly_renewal_is_strictly_after_today() {
        let next = next_renewal_date(date(2024, 1, 15), BillingCycle::Monthly, date(2024, 2, 15));
        assert_eq!(next, date(2024, 3, 15));
    }

    #[test]
    fn monthly_renewal_clamps_to_leap_month_end() {
        let next = next_renewal_date(date(2024, 1, 31), BillingCycle::Monthly, date(2024, 2, 15));
        assert_eq!(next, date(2024, 2, 29));
    }

    #[test]
    fn monthly_renewal_clamps_in_common_year() {
        let next = next_renewal_date(date(2023, 1, 31), BillingCycle::Monthly, date(2023, 2, 15));
        assert_eq!(next, date(2023, 2, 28));
    }

    #[test]
    fn yearly_renewal_steps_whole_years() {
        let next = next_renewal_date(date(2023, 6, 10), BillingCycle::Yearly, date(2024, 8, 6));
        assert_eq!(next, date(2025, 6, 10));
    }

    #[test]
    fn yearly_renewal_clamps_leap_day() {
        let next = next_renewal_date(date(2020, 2, 29), BillingCycle::Yearly, date(2021, 1, 1));
        assert_eq!(next, date(2021, 2, 28));
    }

    #[test]
    fn future_start_date_is_the_first_renewal() {
        let next = next_renewal_date(date(2024, 12, 1), BillingCycle::Monthly, date(2024, 8, 6));
        assert_eq!(next, date(2024, 12, 1));
    }

    #[test]
    fn start_date_equal_to_today_rolls_forward() {
        let next = next_renewal_date(date(2024, 8, 6), BillingCycle::Monthly, date(2024, 8, 6));
        assert_eq!(next, date(2024, 9, 6));
    }

    #[test]
    fn far_past_start_stays_congruent_to_start_day() {
        let next = next_renewal_date(date(1990, 5, 7), BillingCycle::Monthly, date(2024, 8, 6));
        assert_eq!(next, date(2024, 8, 7));

        let next = next_renewal_date(date(1990, 5, 7), BillingCycle::Yearly, date(2024, 8, 6));
        assert_eq!(next, date(2025, 5, 7));
    }

    #[test]
    fn rerunning_from_a_result_stays_in_the_future() {
        let today = date(2024, 8, 6);
        let first = next_renewal_date(date(2024, 1, 31), BillingCycle::Monthly, today);
        assert!(first > today);

        let second = next_renewal_date(first, BillingCycle::Monthly, today);
        assert!(second > today);
        assert_eq!(second, first);
    }

    #[test]
    fn missing_start_date_yields_none() {
        assert_eq!(
            calculate_next_renewal(None, BillingCycle::Monthly, date(2024, 8, 6)),
            None
        );
    }

    #[test]
    fn present_start_date_yields_some() {
        assert_eq!(
            calculate_next_renewal(Some(date(2024, 8, 1)), BillingCycle::Monthly, date(2024, 8, 6)),
            Some(date(2024, 9, 1))
        );
    }
}

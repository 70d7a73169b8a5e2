use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use time::{Date, Month};

use crate::dashboard::dto::CategorySummary;
use crate::expenses::repo::Expense;

/// Truncates a date to the first day of its month, the canonical grouping
/// key for budgets, savings and trend buckets.
pub fn normalize_month(value: Date) -> Date {
    value.replace_day(1).unwrap()
}

/// Shifts a month by a signed delta, wrapping the year with floor-division
/// so negative deltas cross year boundaries correctly. Always returns the
/// first day of the resulting month.
pub fn shift_month(value: Date, delta: i32) -> Date {
    let months = (value.month() as i32 - 1) + delta;
    let year = value.year() + months.div_euclid(12);
    let month = months.rem_euclid(12) as u8 + 1;
    Date::from_calendar_date(year, Month::try_from(month).unwrap(), 1).unwrap()
}

/// First day of the given month, if the pair is representable.
pub fn month_start(year: i32, month: u8) -> Option<Date> {
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, 1).ok()
}

/// Month-over-month change in percent. Undefined (not zero, not an error)
/// when the previous total is zero.
pub fn calculate_mom(current: Decimal, previous: Decimal) -> Option<f64> {
    if previous.is_zero() {
        return None;
    }
    (((current - previous) / previous) * dec!(100)).to_f64()
}

pub fn calculate_percentage(part: Decimal, total: Decimal) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    ((part / total) * dec!(100)).to_f64().unwrap_or(0.0)
}

/// Groups expenses by category label and attaches each group's share of the
/// overall total, sorted by total descending.
pub fn summarize_categories(expenses: &[Expense]) -> (Decimal, Vec<CategorySummary>) {
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    let mut month_total = Decimal::ZERO;
    for expense in expenses {
        month_total += expense.amount;
        *totals.entry(expense.category.as_str()).or_default() += expense.amount;
    }

    let mut summaries: Vec<CategorySummary> = totals
        .into_iter()
        .map(|(category, total)| CategorySummary {
            category: category.to_string(),
            total,
            percentage: calculate_percentage(total, month_total),
        })
        .collect();
    summaries.sort_by(|a, b| b.total.cmp(&a.total));

    (month_total, summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn expense(category: &str, amount: Decimal, date: Date) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount,
            category: category.to_string(),
            date,
            description: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        }
    }

    #[test]
    fn normalize_truncates_to_first_of_month() {
        assert_eq!(normalize_month(date!(2026 - 08 - 29)), date!(2026 - 08 - 01));
        assert_eq!(normalize_month(date!(2026 - 08 - 01)), date!(2026 - 08 - 01));
    }

    #[test]
    fn shift_by_zero_is_identity_on_month_starts() {
        assert_eq!(shift_month(date!(2026 - 08 - 01), 0), date!(2026 - 08 - 01));
        // Mid-month input still normalizes.
        assert_eq!(shift_month(date!(2026 - 08 - 29), 0), date!(2026 - 08 - 01));
    }

    #[test]
    fn shift_wraps_year_boundaries_both_ways() {
        assert_eq!(shift_month(date!(2026 - 01 - 01), -1), date!(2025 - 12 - 01));
        assert_eq!(shift_month(date!(2026 - 12 - 01), 1), date!(2027 - 01 - 01));
        assert_eq!(shift_month(date!(2026 - 02 - 01), -14), date!(2024 - 12 - 01));
        assert_eq!(shift_month(date!(2026 - 02 - 01), 23), date!(2028 - 01 - 01));
    }

    #[test]
    fn shift_is_its_own_inverse() {
        let start = date!(2026 - 03 - 01);
        for k in -30..=30 {
            assert_eq!(shift_month(shift_month(start, k), -k), start, "k={k}");
        }
    }

    #[test]
    fn trend_window_spans_six_months_inclusive() {
        let current = date!(2026 - 08 - 01);
        assert_eq!(shift_month(current, -5), date!(2026 - 03 - 01));
    }

    #[test]
    fn mom_is_undefined_from_zero() {
        assert_eq!(calculate_mom(dec!(80), Decimal::ZERO), None);
        assert_eq!(calculate_mom(Decimal::ZERO, Decimal::ZERO), None);
    }

    #[test]
    fn mom_matches_formula() {
        assert_eq!(calculate_mom(dec!(80.00), dec!(40.00)), Some(100.0));
        assert_eq!(calculate_mom(dec!(30), dec!(40)), Some(-25.0));
        assert_eq!(calculate_mom(Decimal::ZERO, dec!(40)), Some(-100.0));
    }

    #[test]
    fn percentage_of_zero_total_is_zero() {
        assert_eq!(calculate_percentage(dec!(50), Decimal::ZERO), 0.0);
        assert_eq!(calculate_percentage(dec!(50), dec!(200)), 25.0);
    }

    #[test]
    fn category_breakdown_scenario() {
        // Food 50.00 + Transport 30.00 this month.
        let expenses = vec![
            expense("Food", dec!(50.00), date!(2026 - 08 - 10)),
            expense("Transport", dec!(30.00), date!(2026 - 08 - 12)),
        ];
        let (total, breakdown) = summarize_categories(&expenses);
        assert_eq!(total, dec!(80.00));
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, "Food");
        assert_eq!(breakdown[0].total, dec!(50.00));
        assert_eq!(breakdown[0].percentage, 62.5);
        assert_eq!(breakdown[1].category, "Transport");
        assert_eq!(breakdown[1].percentage, 37.5);
    }

    #[test]
    fn category_percentages_sum_to_one_hundred() {
        let expenses = vec![
            expense("Food", dec!(33.33), date!(2026 - 08 - 01)),
            expense("Bills", dec!(33.33), date!(2026 - 08 - 02)),
            expense("Gym", dec!(33.34), date!(2026 - 08 - 03)),
        ];
        let (_, breakdown) = summarize_categories(&expenses);
        let sum: f64 = breakdown.iter().map(|c| c.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_month_has_zero_percentages() {
        let (total, breakdown) = summarize_categories(&[]);
        assert_eq!(total, Decimal::ZERO);
        assert!(breakdown.is_empty());
    }

    #[test]
    fn month_start_rejects_invalid_months() {
        assert_eq!(month_start(2026, 8), Some(date!(2026 - 08 - 01)));
        assert_eq!(month_start(2026, 0), None);
        assert_eq!(month_start(2026, 13), None);
    }
}

use rust_decimal::Decimal;
use time::Date;

use crate::incomes::repo::Income;

/// Membership rule for a month window, the in-memory twin of the SQL in
/// `Income::total_with_recurring`: a one-time income counts when its date
/// falls inside the window; a recurring income counts from its date onward,
/// so it is included whenever it is dated on or before the window end.
pub fn counts_in_window(
    date: Date,
    is_recurring: bool,
    window_start: Date,
    window_end: Date,
) -> bool {
    (date >= window_start && date <= window_end) || (is_recurring && date <= window_end)
}

/// Sum and count over a window, applying `counts_in_window` per row.
pub fn total_in_window(incomes: &[Income], window_start: Date, window_end: Date) -> (Decimal, i64) {
    incomes
        .iter()
        .filter(|income| {
            counts_in_window(income.date, income.is_recurring, window_start, window_end)
        })
        .fold((Decimal::ZERO, 0), |(total, count), income| {
            (total + income.amount, count + 1)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::date;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn income(source: &str, amount: Decimal, date: Date, is_recurring: bool) -> Income {
        Income {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            source: source.to_string(),
            amount,
            date,
            is_recurring,
            frequency: None,
            notes: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        }
    }

    #[test]
    fn recurring_income_counts_in_every_later_window() {
        // Dated two months ago, still feeds both the previous and current
        // month windows.
        let date = date!(2026 - 06 - 15);
        assert!(counts_in_window(
            date,
            true,
            date!(2026 - 08 - 01),
            date!(2026 - 08 - 31)
        ));
        assert!(counts_in_window(
            date,
            true,
            date!(2026 - 07 - 01),
            date!(2026 - 07 - 31)
        ));
    }

    #[test]
    fn recurring_income_starts_at_its_date() {
        // Dated after the window end, recurring or not, it counts nowhere yet.
        let date = date!(2026 - 09 - 03);
        for is_recurring in [true, false] {
            assert!(!counts_in_window(
                date,
                is_recurring,
                date!(2026 - 08 - 01),
                date!(2026 - 08 - 31)
            ));
            assert!(!counts_in_window(
                date,
                is_recurring,
                date!(2026 - 07 - 01),
                date!(2026 - 07 - 31)
            ));
        }
    }

    #[test]
    fn one_time_income_counts_only_in_its_own_month() {
        let date = date!(2026 - 07 - 10);
        assert!(counts_in_window(
            date,
            false,
            date!(2026 - 07 - 01),
            date!(2026 - 07 - 31)
        ));
        assert!(!counts_in_window(
            date,
            false,
            date!(2026 - 08 - 01),
            date!(2026 - 08 - 31)
        ));
    }

    #[test]
    fn window_totals_mix_recurring_and_one_time() {
        let incomes = vec![
            income("Salary", dec!(3000.00), date!(2026 - 06 - 01), true),
            income("Freelance", dec!(500.00), date!(2026 - 07 - 10), false),
            income("Bonus", dec!(1000.00), date!(2026 - 09 - 03), false),
        ];

        // July: salary recurs, freelance lands, bonus is in the future.
        let (total, count) = total_in_window(&incomes, date!(2026 - 07 - 01), date!(2026 - 07 - 31));
        assert_eq!(total, dec!(3500.00));
        assert_eq!(count, 2);

        // August: only the recurring salary remains.
        let (total, count) = total_in_window(&incomes, date!(2026 - 08 - 01), date!(2026 - 08 - 31));
        assert_eq!(total, dec!(3000.00));
        assert_eq!(count, 1);

        let (total, count) = total_in_window(&[], date!(2026 - 08 - 01), date!(2026 - 08 - 31));
        assert_eq!(total, Decimal::ZERO);
        assert_eq!(count, 0);
    }
}

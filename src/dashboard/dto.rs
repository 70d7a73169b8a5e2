use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;

use crate::expenses::repo::Expense;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategorySummary {
    pub category: String,
    pub total: Decimal,
    pub percentage: f64,
}

#[derive(Debug, Serialize)]
pub struct MonthlyCategorySpend {
    pub month: Date,
    pub category: String,
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MonthlyAmount {
    pub month: Date,
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct DashboardOverview {
    pub total_expenses_month: Decimal,
    pub income_total_month: Decimal,
    pub net_balance_month: Decimal,
    /// `None` when the previous month total is zero: a change from zero has
    /// no defined percentage.
    pub expenses_mom_percentage: Option<f64>,
    pub income_mom_percentage: Option<f64>,
    pub expenses_by_category: Vec<CategorySummary>,
    pub monthly_category_spend: Vec<MonthlyCategorySpend>,
    pub monthly_income: Vec<MonthlyAmount>,
    pub monthly_savings: Vec<MonthlyAmount>,
    pub recent_transactions: Vec<Expense>,
    pub wishlist_total: Decimal,
    pub wishlist_count: i64,
}

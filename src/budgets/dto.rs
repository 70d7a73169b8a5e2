use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct BudgetUpsert {
    pub category_id: Uuid,
    pub month: Date,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<Date>,
}

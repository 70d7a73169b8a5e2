use rust_decimal::Decimal;
use serde::Deserialize;
use time::Date;

#[derive(Debug, Deserialize)]
pub struct SavingsUpsert {
    pub month: Date,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub month: Option<Date>,
}

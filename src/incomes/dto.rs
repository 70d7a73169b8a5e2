use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

#[derive(Debug, Deserialize)]
pub struct IncomeCreate {
    pub source: String,
    pub amount: Decimal,
    pub date: Date,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IncomeUpdate {
    pub source: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<Date>,
    pub is_recurring: Option<bool>,
    pub frequency: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IncomeFilter {
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub is_recurring: Option<bool>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Serialize)]
pub struct IncomeTotal {
    pub total: Decimal,
    pub count: i64,
}

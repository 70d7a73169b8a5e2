use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

#[derive(Debug, Deserialize)]
pub struct ExpenseCreate {
    pub amount: Decimal,
    pub category: String,
    pub date: Date,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExpenseUpdate {
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub date: Option<Date>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExpenseFilter {
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub category: Option<String>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Serialize)]
pub struct ExpenseStats {
    pub total: Decimal,
    pub by_category: HashMap<String, Decimal>,
    pub count: usize,
}

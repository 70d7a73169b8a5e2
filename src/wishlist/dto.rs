use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct WishlistCreate {
    pub item_name: String,
    pub price: Decimal,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WishlistUpdate {
    pub item_name: Option<String>,
    pub price: Option<Decimal>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WishlistTotal {
    pub total: Decimal,
    pub count: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct WishlistPurchase {
    pub purchase_date: Option<Date>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub expense_id: Uuid,
    pub message: &'static str,
}

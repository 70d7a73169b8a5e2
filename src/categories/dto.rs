use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::categories::repo::Category;

/// Wraps a field value so that an absent key deserializes to `None` while an
/// explicit `null` deserializes to `Some(None)`. This is what makes partial
/// updates distinguish "leave alone" from "clear".
pub fn patch_field<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub budget_monthly: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryUpdate {
    #[serde(default, deserialize_with = "patch_field")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub color: Option<Option<String>>,
    #[serde(default, deserialize_with = "patch_field")]
    pub budget_monthly: Option<Option<Decimal>>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub budget_monthly: Option<Decimal>,
    pub is_custom: bool,
    pub created_at: OffsetDateTime,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            icon: c.icon,
            color: c.color,
            budget_monthly: c.budget_monthly,
            is_custom: c.is_custom,
            created_at: c.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_field_differs_from_explicit_null() {
        let absent: CategoryUpdate = serde_json::from_str(r#"{}"#).unwrap();
        assert!(absent.budget_monthly.is_none());
        assert!(absent.name.is_none());

        let cleared: CategoryUpdate =
            serde_json::from_str(r#"{"budget_monthly": null}"#).unwrap();
        assert_eq!(cleared.budget_monthly, Some(None));

        let set: CategoryUpdate =
            serde_json::from_str(r#"{"budget_monthly": "150.00", "name": "Pets"}"#).unwrap();
        assert_eq!(
            set.budget_monthly,
            Some(Some("150.00".parse::<Decimal>().unwrap()))
        );
        assert_eq!(set.name, Some(Some("Pets".to_string())));
    }
}

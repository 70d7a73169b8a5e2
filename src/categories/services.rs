use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::categories::dto::CategoryUpdate;
use crate::categories::repo::Category;
use crate::error::ApiError;

pub struct DefaultCategory {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// Canonical seed list; materialized lazily as ownerless rows on first
/// listing so overrides can reference them by id.
pub const DEFAULT_CATEGORIES: [DefaultCategory; 14] = [
    DefaultCategory { name: "Food", icon: "🍔", color: "text-orange-500" },
    DefaultCategory { name: "Transport", icon: "🚌", color: "text-blue-500" },
    DefaultCategory { name: "Shopping", icon: "🛍️", color: "text-pink-500" },
    DefaultCategory { name: "Bills", icon: "💡", color: "text-yellow-500" },
    DefaultCategory { name: "Entertainment", icon: "🎬", color: "text-purple-500" },
    DefaultCategory { name: "Health", icon: "⚕️", color: "text-red-500" },
    DefaultCategory { name: "Education", icon: "📚", color: "text-green-500" },
    DefaultCategory { name: "Savings", icon: "💰", color: "text-emerald-600" },
    DefaultCategory { name: "Travel", icon: "✈️", color: "text-sky-500" },
    DefaultCategory { name: "Gym", icon: "🏋️", color: "text-indigo-500" },
    DefaultCategory { name: "Activities", icon: "🎯", color: "text-green-500" },
    DefaultCategory { name: "Car", icon: "🚗", color: "text-blue-500" },
    DefaultCategory { name: "Supermarket", icon: "🛒", color: "text-amber-500" },
    DefaultCategory { name: "Other", icon: "📦", color: "text-gray-500" },
];

/// Canonical defaults not yet present among the stored ownerless rows.
pub fn missing_defaults(stored_defaults: &[Category]) -> Vec<&'static DefaultCategory> {
    let present: HashSet<&str> = stored_defaults.iter().map(|c| c.name.as_str()).collect();
    DEFAULT_CATEGORIES
        .iter()
        .filter(|seed| !present.contains(seed.name))
        .collect()
}

/// Defaults not shadowed by a same-named custom row, followed by the
/// user's custom rows.
pub fn merge_visible(defaults: Vec<Category>, customs: Vec<Category>) -> Vec<Category> {
    let custom_names: HashSet<String> = customs.iter().map(|c| c.name.clone()).collect();
    let mut visible: Vec<Category> = defaults
        .into_iter()
        .filter(|d| !custom_names.contains(&d.name))
        .collect();
    visible.extend(customs);
    visible
}

/// Field set produced by applying a partial update on top of a base row.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFields {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub budget_monthly: Option<Decimal>,
}

/// Merges explicitly supplied fields over the base row. Unset fields inherit
/// from the base; only the budget may be cleared with an explicit null.
pub fn apply_update(base: &Category, patch: &CategoryUpdate) -> Result<CategoryFields, ApiError> {
    fn required(
        field: &'static str,
        patched: &Option<Option<String>>,
        base: &str,
    ) -> Result<String, ApiError> {
        match patched {
            None => Ok(base.to_string()),
            Some(Some(value)) => Ok(value.clone()),
            Some(None) => Err(ApiError::validation(format!("{field} cannot be null"))),
        }
    }

    Ok(CategoryFields {
        name: required("name", &patch.name, &base.name)?,
        icon: required("icon", &patch.icon, &base.icon)?,
        color: required("color", &patch.color, &base.color)?,
        budget_monthly: match &patch.budget_monthly {
            None => base.budget_monthly,
            Some(value) => *value,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn category(user_id: Option<Uuid>, name: &str, is_custom: bool) -> Category {
        Category {
            id: Uuid::new_v4(),
            user_id,
            name: name.to_string(),
            icon: "📦".to_string(),
            color: "text-gray-500".to_string(),
            budget_monthly: None,
            is_custom,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn missing_defaults_ignores_already_stored_names() {
        let stored = vec![category(None, "Food", false), category(None, "Car", false)];
        let missing = missing_defaults(&stored);
        assert_eq!(missing.len(), DEFAULT_CATEGORIES.len() - 2);
        assert!(missing.iter().all(|c| c.name != "Food" && c.name != "Car"));
    }

    #[test]
    fn missing_defaults_empty_when_fully_seeded() {
        let stored: Vec<Category> = DEFAULT_CATEGORIES
            .iter()
            .map(|seed| category(None, seed.name, false))
            .collect();
        assert!(missing_defaults(&stored).is_empty());
    }

    #[test]
    fn merge_shadows_defaults_by_name() {
        let user = Uuid::new_v4();
        let defaults = vec![
            category(None, "Food", false),
            category(None, "Transport", false),
        ];
        let customs = vec![
            category(Some(user), "Food", true),
            category(Some(user), "Pets", true),
        ];
        let visible = merge_visible(defaults, customs);

        // Exactly one row per distinct name, customs win.
        let names: Vec<&str> = visible.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Transport", "Food", "Pets"]);
        let food = visible.iter().find(|c| c.name == "Food").unwrap();
        assert!(food.is_custom);
    }

    #[test]
    fn merge_yields_unique_names() {
        let user = Uuid::new_v4();
        let defaults: Vec<Category> = DEFAULT_CATEGORIES
            .iter()
            .map(|seed| category(None, seed.name, false))
            .collect();
        let customs = vec![
            category(Some(user), "Food", true),
            category(Some(user), "Pets", true),
        ];
        let visible = merge_visible(defaults, customs);
        let unique: HashSet<&str> = visible.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(unique.len(), visible.len());
        assert_eq!(visible.len(), DEFAULT_CATEGORIES.len() + 1);
    }

    #[test]
    fn unset_fields_inherit_from_base() {
        let base = category(None, "Food", false);
        let patch = CategoryUpdate {
            icon: Some(Some("🌮".to_string())),
            ..Default::default()
        };
        let fields = apply_update(&base, &patch).unwrap();
        assert_eq!(fields.name, "Food");
        assert_eq!(fields.icon, "🌮");
        assert_eq!(fields.color, base.color);
        assert_eq!(fields.budget_monthly, None);
    }

    #[test]
    fn explicit_null_clears_budget_but_not_name() {
        let mut base = category(None, "Food", false);
        base.budget_monthly = Some("200.00".parse().unwrap());

        let clear_budget = CategoryUpdate {
            budget_monthly: Some(None),
            ..Default::default()
        };
        let fields = apply_update(&base, &clear_budget).unwrap();
        assert_eq!(fields.budget_monthly, None);

        let null_name = CategoryUpdate {
            name: Some(None),
            ..Default::default()
        };
        assert!(apply_update(&base, &null_name).is_err());
    }
}

use anyhow::Context;
use time::{Date, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::expenses::repo::Expense;
use crate::state::AppState;
use crate::wishlist::repo::WishlistItem;

/// Default expense label when a purchase carries no category override.
const PURCHASE_CATEGORY: &str = "Shopping";

pub fn purchase_description(item_name: &str, notes: Option<&str>) -> String {
    match notes {
        Some(notes) if !notes.is_empty() => format!("Purchased: {item_name} - {notes}"),
        _ => format!("Purchased: {item_name}"),
    }
}

/// Converts a wishlist item into an expense. Both writes run in one
/// transaction: the expense insert and the item delete apply together or
/// not at all.
pub async fn convert_to_expense(
    state: &AppState,
    user_id: Uuid,
    item: &WishlistItem,
    purchase_date: Option<Date>,
    category: Option<&str>,
) -> anyhow::Result<Expense> {
    let date = purchase_date.unwrap_or_else(|| OffsetDateTime::now_utc().date());
    let category = category.unwrap_or(PURCHASE_CATEGORY);
    let description = purchase_description(&item.item_name, item.notes.as_deref());

    let mut tx = state.db.begin().await.context("begin purchase tx")?;
    let expense = Expense::create_tx(
        &mut tx,
        user_id,
        item.price,
        category,
        date,
        Some(&description),
    )
    .await?;
    WishlistItem::delete_tx(&mut tx, item.id).await?;
    tx.commit().await.context("commit purchase tx")?;

    info!(
        user_id = %user_id,
        item_id = %item.id,
        expense_id = %expense.id,
        "wishlist item converted to expense"
    );
    Ok(expense)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_includes_name_and_notes() {
        assert_eq!(
            purchase_description("Headphones", None),
            "Purchased: Headphones"
        );
        assert_eq!(
            purchase_description("Headphones", Some("noise cancelling")),
            "Purchased: Headphones - noise cancelling"
        );
        assert_eq!(
            purchase_description("Headphones", Some("")),
            "Purchased: Headphones"
        );
    }
}

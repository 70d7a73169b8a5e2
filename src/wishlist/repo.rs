use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::wishlist::dto::WishlistUpdate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct WishlistItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_name: String,
    pub price: Decimal,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

const COLUMNS: &str =
    "id, user_id, item_name, price, url, image_url, notes, created_at, updated_at";

impl WishlistItem {
    pub async fn list(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<WishlistItem>> {
        sqlx::query_as::<_, WishlistItem>(&format!(
            "SELECT {COLUMNS} FROM wishlist WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn find(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<Option<WishlistItem>> {
        sqlx::query_as::<_, WishlistItem>(&format!(
            "SELECT {COLUMNS} FROM wishlist WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        item_name: &str,
        price: Decimal,
        url: Option<&str>,
        image_url: Option<&str>,
        notes: Option<&str>,
    ) -> sqlx::Result<WishlistItem> {
        sqlx::query_as::<_, WishlistItem>(&format!(
            r#"
            INSERT INTO wishlist (user_id, item_name, price, url, image_url, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(item_name)
        .bind(price)
        .bind(url)
        .bind(image_url)
        .bind(notes)
        .fetch_one(db)
        .await
    }

    pub async fn update(
        &self,
        db: &PgPool,
        changes: &WishlistUpdate,
        image_url: Option<&str>,
    ) -> sqlx::Result<WishlistItem> {
        sqlx::query_as::<_, WishlistItem>(&format!(
            r#"
            UPDATE wishlist
            SET item_name = $2, price = $3, url = $4, image_url = $5, notes = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(self.id)
        .bind(changes.item_name.as_deref().unwrap_or(&self.item_name))
        .bind(changes.price.unwrap_or(self.price))
        .bind(changes.url.as_deref().or(self.url.as_deref()))
        .bind(image_url)
        .bind(changes.notes.as_deref().or(self.notes.as_deref()))
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM wishlist WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete inside a caller-owned transaction (purchase conversion).
    pub async fn delete_tx(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM wishlist WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub async fn total(db: &PgPool, user_id: Uuid) -> sqlx::Result<(Decimal, i64)> {
        let row: (Option<Decimal>, i64) =
            sqlx::query_as("SELECT SUM(price), COUNT(id) FROM wishlist WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(db)
                .await?;
        Ok((row.0.unwrap_or_default(), row.1))
    }
}

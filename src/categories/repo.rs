use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::categories::services::DefaultCategory;

#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: Uuid,
    /// `None` marks a shared default category.
    pub user_id: Option<Uuid>,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub budget_monthly: Option<Decimal>,
    pub is_custom: bool,
    pub created_at: OffsetDateTime,
}

const COLUMNS: &str = "id, user_id, name, icon, color, budget_monthly, is_custom, created_at";

impl Category {
    pub async fn list_custom(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE user_id = $1 ORDER BY name"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn list_defaults(db: &PgPool) -> sqlx::Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE user_id IS NULL ORDER BY name"
        ))
        .fetch_all(db)
        .await
    }

    /// Inserts missing default rows. `ON CONFLICT DO NOTHING` makes the seed
    /// idempotent: a concurrent first listing loses the insert, not the read.
    pub async fn seed_defaults(db: &PgPool, missing: &[&DefaultCategory]) -> sqlx::Result<()> {
        for seed in missing {
            sqlx::query(
                r#"
                INSERT INTO categories (user_id, name, icon, color, is_custom)
                VALUES (NULL, $1, $2, $3, FALSE)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(seed.name)
            .bind(seed.icon)
            .bind(seed.color)
            .execute(db)
            .await?;
        }
        Ok(())
    }

    pub async fn find_custom(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<Option<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE id = $1 AND user_id = $2 AND is_custom"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_custom_by_name(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
    ) -> sqlx::Result<Option<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE user_id = $1 AND name = $2"
        ))
        .bind(user_id)
        .bind(name)
        .fetch_optional(db)
        .await
    }

    pub async fn find_default(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {COLUMNS} FROM categories WHERE id = $1 AND user_id IS NULL AND NOT is_custom"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Looks a category up without an owner filter; callers decide whether
    /// the row is visible to the requesting user.
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Category>> {
        sqlx::query_as::<_, Category>(&format!("SELECT {COLUMNS} FROM categories WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create_custom(
        db: &PgPool,
        user_id: Uuid,
        name: &str,
        icon: &str,
        color: &str,
        budget_monthly: Option<Decimal>,
    ) -> sqlx::Result<Category> {
        sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (user_id, name, icon, color, budget_monthly, is_custom)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(name)
        .bind(icon)
        .bind(color)
        .bind(budget_monthly)
        .fetch_one(db)
        .await
    }

    pub async fn update_custom(
        db: &PgPool,
        id: Uuid,
        name: &str,
        icon: &str,
        color: &str,
        budget_monthly: Option<Decimal>,
    ) -> sqlx::Result<Category> {
        sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories
            SET name = $2, icon = $3, color = $4, budget_monthly = $5
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(icon)
        .bind(color)
        .bind(budget_monthly)
        .fetch_one(db)
        .await
    }

    /// Deletes a user-owned custom row; returns whether anything was removed.
    pub async fn delete_custom(db: &PgPool, user_id: Uuid, id: Uuid) -> sqlx::Result<bool> {
        let result = sqlx::query(
            "DELETE FROM categories WHERE id = $1 AND user_id = $2 AND is_custom",
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

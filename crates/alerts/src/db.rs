//! SQLite storage for tracked items.

use crate::store::ItemStore;
use async_trait::async_trait;
use pricewatch_core::{parse_price, Decimal, TrackedItem};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Tracked item not found: {0}")]
    ItemNotFound(String),
    #[error("Invalid stored price for {identifier}: {value}")]
    InvalidPrice { identifier: String, value: String },
}

/// Prices are stored as decimal text so no digits are lost.
type ItemRow = (String, String, Option<String>);

fn stored_price(identifier: &str, value: &str) -> Result<Decimal, DbError> {
    parse_price(value).ok_or_else(|| DbError::InvalidPrice {
        identifier: identifier.to_string(),
        value: value.to_string(),
    })
}

fn item_from_row((identifier, target_price, last_checked_price): ItemRow) -> Result<TrackedItem, DbError> {
    let target_price = stored_price(&identifier, &target_price)?;
    let last_checked_price = last_checked_price
        .map(|value| stored_price(&identifier, &value))
        .transpose()?;
    Ok(TrackedItem {
        identifier,
        target_price,
        last_checked_price,
    })
}

/// Database connection for tracked items.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to SQLite database at the given path.
    pub async fn connect(database_url: &str) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Run database migrations.
    async fn run_migrations(&self) -> Result<(), DbError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tracked_items (
                product_name TEXT PRIMARY KEY NOT NULL,
                target_price TEXT NOT NULL,
                last_checked_price TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert an item, or replace the target price of an existing one.
    /// The last checked price is only overwritten when the item carries one.
    pub async fn upsert_item(&self, item: &TrackedItem) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO tracked_items (product_name, target_price, last_checked_price)
            VALUES (?, ?, ?)
            ON CONFLICT(product_name)
            DO UPDATE SET
                target_price = excluded.target_price,
                last_checked_price = COALESCE(excluded.last_checked_price, last_checked_price)
            "#,
        )
        .bind(&item.identifier)
        .bind(item.target_price.to_string())
        .bind(item.last_checked_price.map(|p| p.to_string()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get one item by identifier.
    pub async fn get_item(&self, identifier: &str) -> Result<Option<TrackedItem>, DbError> {
        let row = sqlx::query_as::<_, ItemRow>(
            "SELECT product_name, target_price, last_checked_price FROM tracked_items WHERE product_name = ?",
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        row.map(item_from_row).transpose()
    }

    /// Close the pool. Later queries fail with a pool-closed error.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ItemStore for Database {
    async fn list_items(&self) -> Result<Vec<TrackedItem>, DbError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            "SELECT product_name, target_price, last_checked_price FROM tracked_items ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(item_from_row).collect()
    }

    async fn update_last_checked_price(
        &self,
        identifier: &str,
        price: Decimal,
    ) -> Result<(), DbError> {
        let result =
            sqlx::query("UPDATE tracked_items SET last_checked_price = ? WHERE product_name = ?")
                .bind(price.normalize().to_string())
                .bind(identifier)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::ItemNotFound(identifier.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn price(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[tokio::test]
    async fn test_database_connect_empty() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let items = db.list_items().await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_list_items_in_insertion_order() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.upsert_item(&TrackedItem::new("solana", price("150.0")))
            .await
            .unwrap();
        db.upsert_item(&TrackedItem::new("bitcoin", price("60000.0")))
            .await
            .unwrap();
        db.upsert_item(
            &TrackedItem::new("ethereum", price("4000.0")).with_last_checked_price(price("4200.0")),
        )
        .await
        .unwrap();

        let items = db.list_items().await.unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.identifier.as_str()).collect();
        assert_eq!(names, vec!["solana", "bitcoin", "ethereum"]);
        assert_eq!(items[2].last_checked_price, Some(price("4200.0")));
        assert_eq!(items[0].last_checked_price, None);
    }

    #[tokio::test]
    async fn test_update_last_checked_price() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.upsert_item(
            &TrackedItem::new("ethereum", price("4000.0")).with_last_checked_price(price("4200.0")),
        )
        .await
        .unwrap();

        db.update_last_checked_price("ethereum", price("3900.12"))
            .await
            .unwrap();

        let item = db.get_item("ethereum").await.unwrap().unwrap();
        assert_eq!(item.last_checked_price, Some(price("3900.12")));
        assert_eq!(item.target_price, price("4000.0"));
    }

    #[tokio::test]
    async fn test_update_missing_item_fails() {
        let db = Database::connect("sqlite::memory:").await.unwrap();

        let err = db
            .update_last_checked_price("doge", price("0.1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ItemNotFound(ref id) if id == "doge"));

        // Conditional update must not create the row
        assert!(db.get_item("doge").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_keeps_last_checked_price() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.upsert_item(
            &TrackedItem::new("bitcoin", price("60000.0")).with_last_checked_price(price("61000.0")),
        )
        .await
        .unwrap();

        // Editing the target alone leaves the observed price in place
        db.upsert_item(&TrackedItem::new("bitcoin", price("58000.0")))
            .await
            .unwrap();

        let item = db.get_item("bitcoin").await.unwrap().unwrap();
        assert_eq!(item.target_price, price("58000.0"));
        assert_eq!(item.last_checked_price, Some(price("61000.0")));
    }

    #[tokio::test]
    async fn test_sub_cent_prices_stored_exactly() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.upsert_item(&TrackedItem::new("babydoge", price("0.000000014")))
            .await
            .unwrap();

        db.update_last_checked_price("babydoge", price("0.0000000012"))
            .await
            .unwrap();

        let item = db.get_item("babydoge").await.unwrap().unwrap();
        assert_eq!(item.target_price, price("0.000000014"));
        assert_eq!(item.last_checked_price, Some(price("0.0000000012")));
    }

    #[tokio::test]
    async fn test_unparseable_stored_price_is_rejected() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        sqlx::query("INSERT INTO tracked_items (product_name, target_price) VALUES (?, ?)")
            .bind("ethereum")
            .bind("four thousand")
            .execute(&db.pool)
            .await
            .unwrap();

        let err = db.list_items().await.unwrap_err();
        assert!(matches!(
            err,
            DbError::InvalidPrice { ref identifier, ref value }
                if identifier == "ethereum" && value == "four thousand"
        ));
    }

    #[tokio::test]
    async fn test_list_after_close_fails() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.close().await;

        let result = db.list_items().await;
        assert!(matches!(result, Err(DbError::Sqlx(_))));
    }
}

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};
use uuid::Uuid;

use super::JoinedProduct;
use crate::domain::models::{CartEntry, CartLine, MAX_LINE_QUANTITY};

#[derive(Debug, FromRow)]
struct CartLineRow {
    id: String,
    product_id: String,
    quantity: i64,
    created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    product: JoinedProduct,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            created_at: row.created_at,
            product: row.product.into_product(),
        }
    }
}

#[derive(Debug, FromRow)]
struct CartEntryRow {
    id: String,
    product_id: String,
    quantity: i64,
}

pub struct CartRepository;

impl CartRepository {
    /// 购物车全部条目（最新在前），商品已删除时 `product` 为 None
    pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<CartLine>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT c.id, c.product_id, c.quantity, c.created_at, {}
            FROM cart_items c
            LEFT JOIN products p ON p.id = c.product_id
            ORDER BY c.created_at DESC, c.rowid DESC
            "#,
            JoinedProduct::COLUMNS
        );

        let rows = sqlx::query_as::<_, CartLineRow>(&sql)
            .fetch_all(&mut *conn)
            .await?;

        Ok(rows.into_iter().map(CartLine::from).collect())
    }

    /// Inserts a line for `product_id` or adds `quantity` to the existing
    /// one, in a single statement. Returns `None`, leaving the line as it
    /// was, when the merged quantity would exceed [`MAX_LINE_QUANTITY`].
    pub async fn add_or_increment(
        conn: &mut SqliteConnection,
        product_id: &str,
        quantity: i64,
    ) -> Result<Option<CartEntry>, sqlx::Error> {
        let row = sqlx::query_as::<_, CartEntryRow>(
            r#"
            INSERT INTO cart_items (id, product_id, quantity, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (product_id) DO UPDATE SET quantity = cart_items.quantity + excluded.quantity
            WHERE cart_items.quantity <= ? - excluded.quantity
            RETURNING id, product_id, quantity
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(product_id)
        .bind(quantity)
        .bind(Utc::now())
        .bind(MAX_LINE_QUANTITY)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(|row| CartEntry {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
        }))
    }

    pub async fn update_quantity(conn: &mut SqliteConnection, id: &str, quantity: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(r#"UPDATE cart_items SET quantity = ? WHERE id = ?"#)
            .bind(quantity)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM cart_items WHERE id = ?"#)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn clear(conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM cart_items"#)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}

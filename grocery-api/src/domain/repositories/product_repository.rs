use sqlx::SqliteConnection;

use crate::domain::models::Product;

pub struct ProductRepository;

impl ProductRepository {
    pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, sku, created_at, updated_at
            FROM products
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .fetch_all(&mut *conn)
        .await
    }

    pub async fn find_by_id(conn: &mut SqliteConnection, id: &str) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, sku, created_at, updated_at
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
    }

    /// 按名称或 SKU 精确匹配，多条命中时取最早创建的
    pub async fn find_by_label(conn: &mut SqliteConnection, label: &str) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, sku, created_at, updated_at
            FROM products
            WHERE name = ? OR sku = ?
            ORDER BY created_at ASC, rowid ASC
            LIMIT 1
            "#,
        )
        .bind(label)
        .bind(label)
        .fetch_optional(&mut *conn)
        .await
    }

    pub async fn count(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM products"#)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count.0)
    }

    pub async fn insert(conn: &mut SqliteConnection, product: &Product) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, price, sku, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.sku)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    pub async fn update(conn: &mut SqliteConnection, product: &Product) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, price = ?, sku = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.sku)
        .bind(product.updated_at)
        .bind(&product.id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(conn: &mut SqliteConnection, id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM products WHERE id = ?"#)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }
}

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};

use super::JoinedProduct;
use crate::domain::models::{Transaction, TransactionDraft, TransactionLine};

#[derive(Debug, FromRow)]
struct TransactionRow {
    id: String,
    total: f64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct TransactionLineRow {
    id: String,
    transaction_id: String,
    product_id: String,
    quantity: i64,
    unit_price: f64,
    line_total: f64,
    #[sqlx(flatten)]
    product: JoinedProduct,
}

impl From<TransactionLineRow> for TransactionLine {
    fn from(row: TransactionLineRow) -> Self {
        Self {
            id: row.id,
            transaction_id: row.transaction_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price: row.unit_price,
            line_total: row.line_total,
            product: row.product.into_product(),
        }
    }
}

fn lines_sql(filter: &str) -> String {
    format!(
        r#"
        SELECT i.id, i.transaction_id, i.product_id, i.quantity, i.unit_price, i.line_total, {}
        FROM transaction_items i
        LEFT JOIN products p ON p.id = i.product_id
        {}
        ORDER BY i.rowid ASC
        "#,
        JoinedProduct::COLUMNS,
        filter
    )
}

pub struct TransactionRepository;

impl TransactionRepository {
    /// 写入交易及其明细，调用方负责事务边界
    pub async fn insert(conn: &mut SqliteConnection, draft: &TransactionDraft) -> Result<(), sqlx::Error> {
        sqlx::query(r#"INSERT INTO transactions (id, total, created_at) VALUES (?, ?, ?)"#)
            .bind(&draft.id)
            .bind(draft.total)
            .bind(draft.created_at)
            .execute(&mut *conn)
            .await?;

        for item in &draft.items {
            sqlx::query(
                r#"
                INSERT INTO transaction_items (id, transaction_id, product_id, quantity, unit_price, line_total)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&item.id)
            .bind(&draft.id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.line_total)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    pub async fn find_by_id(conn: &mut SqliteConnection, id: &str) -> Result<Option<Transaction>, sqlx::Error> {
        let Some(row) = sqlx::query_as::<_, TransactionRow>(
            r#"SELECT id, total, created_at FROM transactions WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        else {
            return Ok(None);
        };

        let sql = lines_sql("WHERE i.transaction_id = ?");
        let items = sqlx::query_as::<_, TransactionLineRow>(&sql)
            .bind(id)
            .fetch_all(&mut *conn)
            .await?
            .into_iter()
            .map(TransactionLine::from)
            .collect();

        Ok(Some(Transaction {
            id: row.id,
            total: row.total,
            created_at: row.created_at,
            items,
        }))
    }

    /// 全部交易（最新在前），每笔附带明细
    pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Transaction>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"SELECT id, total, created_at FROM transactions ORDER BY created_at DESC, rowid DESC"#,
        )
        .fetch_all(&mut *conn)
        .await?;

        let sql = lines_sql("");
        let mut lines_by_transaction: HashMap<String, Vec<TransactionLine>> = HashMap::new();
        for line in sqlx::query_as::<_, TransactionLineRow>(&sql)
            .fetch_all(&mut *conn)
            .await?
        {
            lines_by_transaction
                .entry(line.transaction_id.clone())
                .or_default()
                .push(TransactionLine::from(line));
        }

        Ok(rows
            .into_iter()
            .map(|row| Transaction {
                items: lines_by_transaction.remove(&row.id).unwrap_or_default(),
                id: row.id,
                total: row.total,
                created_at: row.created_at,
            })
            .collect())
    }
}

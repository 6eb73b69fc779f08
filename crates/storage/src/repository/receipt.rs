use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::{Result, StorageError};
use crate::models::{EcoScore, ReceiptItem, ReceiptReplacement};

pub struct ReceiptRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReceiptRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_transaction(&self, transaction_id: i64) -> Result<Vec<ReceiptItem>> {
        let items = sqlx::query_as::<_, ReceiptItem>(
            r#"
            SELECT id, transaction_id, name, price, qty, kg_co2e, item_score, created_at
            FROM receipt_items
            WHERE transaction_id = $1
            ORDER BY id
            "#,
        )
        .bind(transaction_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Swap a transaction's receipt items for a new set and write the derived
    /// score, cashback and cleared receipt flag, all in one commit.
    ///
    /// The transaction row is locked first, so concurrent replacements for the
    /// same transaction queue behind each other. Any error rolls the whole
    /// replacement back and leaves the previous items in place.
    pub async fn replace_items(&self, replacement: &ReceiptReplacement) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i64>("SELECT id FROM transactions WHERE id = $1 FOR UPDATE")
            .bind(replacement.transaction_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StorageError::NotFound)?;

        sqlx::query("DELETE FROM receipt_items WHERE transaction_id = $1")
            .bind(replacement.transaction_id)
            .execute(&mut *tx)
            .await?;

        let mut inserted = 0;
        if !replacement.items.is_empty() {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO receipt_items (transaction_id, name, price, qty, kg_co2e, item_score) ",
            );
            builder.push_values(&replacement.items, |mut row, item| {
                row.push_bind(replacement.transaction_id)
                    .push_bind(item.name.clone())
                    .push_bind(item.price)
                    .push_bind(item.qty)
                    .push_bind(item.kg_co2e)
                    .push_bind(item.item_score.as_i16());
            });

            inserted = builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    let err = StorageError::from(e);
                    if err.is_check_violation() {
                        StorageError::ConstraintViolation(
                            "Receipt item violates a column constraint".to_string(),
                        )
                    } else {
                        err
                    }
                })?
                .rows_affected();
        }

        update_eco_fields(
            &mut tx,
            replacement.transaction_id,
            replacement.eco_score,
            replacement.cashback_usd,
        )
        .await?;

        tx.commit().await?;
        Ok(inserted)
    }
}

async fn update_eco_fields(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    transaction_id: i64,
    eco_score: EcoScore,
    cashback_usd: Decimal,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE transactions
        SET eco_score = $1,
            cashback_usd = $2,
            needs_receipt = FALSE
        WHERE id = $3
        "#,
    )
    .bind(eco_score.as_i16())
    .bind(cashback_usd)
    .bind(transaction_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

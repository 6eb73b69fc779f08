use sqlx::PgPool;
use storage::{
    dto::eco::{EcoSummaryResponse, ScoreSource, ScoredItemResponse},
    error::Result,
    models::{EcoScore, ReceiptItem, Transaction},
    repository::{receipt::ReceiptRepository, transaction::TransactionRepository},
    services::eco_scoring,
};

/// Eco summary of one of the user's transactions
pub async fn get_eco_summary(
    pool: &PgPool,
    user_id: i64,
    transaction_id: i64,
) -> Result<EcoSummaryResponse> {
    let transaction = TransactionRepository::new(pool)
        .find_for_user(user_id, transaction_id)
        .await?;

    let items = if transaction.eco_score.is_some() {
        ReceiptRepository::new(pool)
            .list_for_transaction(transaction.id)
            .await?
    } else {
        Vec::new()
    };

    Ok(build_eco_summary(transaction, items))
}

/// Uses the stored receipt score when there is one, otherwise the category
/// heuristic.
pub fn build_eco_summary(transaction: Transaction, items: Vec<ReceiptItem>) -> EcoSummaryResponse {
    let merchant = transaction
        .merchant_name
        .as_deref()
        .unwrap_or(transaction.name.as_str());
    let receipt_recommended = eco_scoring::is_mixed_merchant(Some(merchant));

    let (eco_score, cashback, source) = match transaction.eco_score {
        Some(stored) => {
            let score = EcoScore::clamped(i64::from(stored));
            let cashback = transaction
                .cashback_usd
                .unwrap_or_else(|| eco_scoring::compute_cashback(transaction.amount, Some(score)));
            (score, cashback, ScoreSource::Receipt)
        }
        None => {
            let score = eco_scoring::quick_category_score(transaction.categories());
            let cashback = eco_scoring::compute_cashback(transaction.amount, Some(score));
            (score, cashback, ScoreSource::CategoryHeuristic)
        }
    };

    EcoSummaryResponse {
        transaction_id: transaction.id,
        amount: transaction.amount,
        eco_score: eco_score.value(),
        cashback_usd: eco_scoring::format_currency(cashback),
        source,
        needs_receipt: transaction.needs_receipt,
        receipt_recommended,
        items: items.into_iter().map(ScoredItemResponse::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn transaction(merchant: Option<&str>, categories: &[&str], amount: &str) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        Transaction {
            id: 11,
            user_id: 2,
            external_id: None,
            date,
            name: "Card purchase".to_string(),
            merchant_name: merchant.map(str::to_string),
            amount: dec(amount),
            iso_currency_code: Some("USD".to_string()),
            category: Some(categories.iter().map(|c| c.to_string()).collect()),
            eco_score: None,
            cashback_usd: None,
            needs_receipt: true,
            created_at: date.and_hms_opt(9, 30, 0).unwrap(),
        }
    }

    fn item(name: &str, price: &str, score: i16) -> ReceiptItem {
        ReceiptItem {
            id: 1,
            transaction_id: 11,
            name: name.to_string(),
            price: Some(dec(price)),
            qty: None,
            kg_co2e: dec("0.6"),
            item_score: score,
            created_at: NaiveDate::from_ymd_opt(2025, 2, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_unscored_transaction_uses_category_heuristic() {
        let summary = build_eco_summary(
            transaction(Some("Metro Transit"), &["Travel", "Public Transit"], "100.00"),
            Vec::new(),
        );

        assert_eq!(summary.source, ScoreSource::CategoryHeuristic);
        assert_eq!(summary.eco_score, 9);
        // 1 + 1 × (0.15 + 0.9 × 4.85) = 5.515
        assert_eq!(summary.cashback_usd, "5.52");
        assert!(summary.needs_receipt);
        assert!(!summary.receipt_recommended);
        assert!(summary.items.is_empty());
    }

    #[test]
    fn test_unknown_categories_score_neutral() {
        let summary = build_eco_summary(transaction(None, &[], "100.00"), Vec::new());

        assert_eq!(summary.eco_score, 5);
        assert_eq!(summary.cashback_usd, "3.58");
    }

    #[test]
    fn test_processed_receipt_uses_stored_values() {
        let mut tx = transaction(Some("Whole Foods"), &["Groceries"], "40.00");
        tx.eco_score = Some(7);
        tx.cashback_usd = Some(dec("1.82"));
        tx.needs_receipt = false;

        let summary = build_eco_summary(tx, vec![item("Kale", "6.00", 9)]);

        assert_eq!(summary.source, ScoreSource::Receipt);
        assert_eq!(summary.eco_score, 7);
        assert_eq!(summary.cashback_usd, "1.82");
        assert!(!summary.needs_receipt);
        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.items[0].item_score, 9);
    }

    #[test]
    fn test_mixed_merchant_recommends_receipt() {
        let summary = build_eco_summary(
            transaction(Some("WALMART SUPERCENTER #42"), &["Shops"], "25.00"),
            Vec::new(),
        );
        assert!(summary.receipt_recommended);

        let by_name = build_eco_summary(transaction(None, &["Shops"], "25.00"), Vec::new());
        assert!(!by_name.receipt_recommended);
    }
}

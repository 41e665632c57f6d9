//! Tests for the order log and valuation history.

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::accounts::User;
    use crate::errors::Error;
    use crate::history::{HistoryService, HistoryServiceTrait, Order, ValuationHistory};
    use crate::money::Money;
    use crate::portfolio::{Portfolio, TradeAction};
    use crate::store::test_utils::{BrokenStore, ScriptedStore};
    use crate::store::{CollectionPath, DocumentStore, InMemoryDocumentStore};

    const USER: &str = "github_1";

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn order(date: DateTime<Utc>) -> Order {
        Order {
            date,
            ticker: "BTC".to_string(),
            action: TradeAction::Buy,
            size: Money::new(0, 500_000_000),
            price: Money::from_units(50_000),
        }
    }

    fn valuations() -> CollectionPath {
        CollectionPath::root("users")
            .doc(USER)
            .sub_collection("valuations")
    }

    // ==================== Orders ====================

    #[tokio::test]
    async fn test_append_and_list_orders() {
        let service = HistoryService::new(Arc::new(InMemoryDocumentStore::new()));
        let first = order(at(1_620_061_451));
        let second = order(at(1_620_061_451) + Duration::nanoseconds(1));

        service.append_order(USER, &first).await.unwrap();
        service.append_order(USER, &second).await.unwrap();

        let mut orders = service.list_orders(USER).await.unwrap();
        orders.sort_by_key(|o| o.date);
        assert_eq!(orders, vec![first, second]);
        assert!(service.list_orders("github_2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_order_never_overwrites() {
        let service = HistoryService::new(Arc::new(InMemoryDocumentStore::new()));
        let first = order(at(1_620_061_451));
        service.append_order(USER, &first).await.unwrap();

        let mut clash = first.clone();
        clash.action = TradeAction::Sell;
        let err = service.append_order(USER, &clash).await.unwrap_err();

        assert!(matches!(err, Error::DuplicateKey(_)));
        assert_eq!(service.list_orders(USER).await.unwrap(), vec![first]);
    }

    // ==================== Valuations ====================

    #[tokio::test]
    async fn test_record_valuation_truncates_to_second() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let service = HistoryService::new(store.clone());
        let instant = at(1_620_061_451) + Duration::milliseconds(750);

        let entry = service
            .record_valuation(USER, instant, Money::from_units(10))
            .await
            .unwrap();

        assert_eq!(entry.date, at(1_620_061_451));
        let doc = store
            .get(&valuations().doc("2021-05-03T17:04:11Z"))
            .await
            .unwrap();
        assert!(doc.is_some());
    }

    #[tokio::test]
    async fn test_record_valuation_is_idempotent() {
        let service = HistoryService::new(Arc::new(InMemoryDocumentStore::new()));
        let t = at(1_620_061_451);

        service
            .record_valuation(USER, t, Money::from_units(10))
            .await
            .unwrap();
        let again = service
            .record_valuation(USER, t + Duration::milliseconds(10), Money::from_units(99))
            .await
            .unwrap();

        assert_eq!(again.value, Money::from_units(10));
        assert_eq!(
            service.list_valuation_history(USER).await.unwrap(),
            vec![ValuationHistory {
                date: t,
                value: Money::from_units(10)
            }]
        );
    }

    #[tokio::test]
    async fn test_rotation_respects_cutoff() {
        let service = HistoryService::new(Arc::new(InMemoryDocumentStore::new()));
        let cutoff = at(1_620_000_000);
        for t in [cutoff - Duration::seconds(1), cutoff, cutoff + Duration::seconds(1)] {
            service
                .record_valuation(USER, t, Money::from_units(1))
                .await
                .unwrap();
        }

        let deleted = service.rotate_valuation_history(USER, cutoff).await.unwrap();

        assert_eq!(deleted, 1);
        let mut remaining: Vec<_> = service
            .list_valuation_history(USER)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.date)
            .collect();
        remaining.sort();
        assert_eq!(remaining, vec![cutoff, cutoff + Duration::seconds(1)]);
    }

    #[tokio::test]
    async fn test_rotation_deletes_in_batches() {
        let inner = Arc::new(InMemoryDocumentStore::with_max_batch_size(3));
        let store = Arc::new(ScriptedStore::new(inner.clone()));
        let service = HistoryService::new(store.clone());
        let base = at(1_620_000_000);
        for i in 0..8 {
            service
                .record_valuation(USER, base + Duration::seconds(i), Money::from_units(i))
                .await
                .unwrap();
        }

        let deleted = service
            .rotate_valuation_history(USER, base + Duration::seconds(7))
            .await
            .unwrap();

        assert_eq!(deleted, 7);
        assert_eq!(store.delete_batches.load(Ordering::SeqCst), 3);
        assert_eq!(inner.document_count(&valuations()), 1);
    }

    #[tokio::test]
    async fn test_rotation_with_nothing_expired_writes_nothing() {
        let store = Arc::new(ScriptedStore::new(Arc::new(InMemoryDocumentStore::new())));
        let service = HistoryService::new(store.clone());
        service
            .record_valuation(USER, at(1_620_000_000), Money::from_units(1))
            .await
            .unwrap();

        let deleted = service
            .rotate_valuation_history(USER, at(1_610_000_000))
            .await
            .unwrap();

        assert_eq!(deleted, 0);
        assert_eq!(store.delete_batches.load(Ordering::SeqCst), 0);
    }

    // ==================== Snapshots ====================

    #[tokio::test]
    async fn test_portfolio_snapshot() {
        let service = HistoryService::new(Arc::new(InMemoryDocumentStore::new()));
        let mut positions = BTreeMap::new();
        positions.insert("BTC".to_string(), Money::new(0, 500_000_000));
        let user = User {
            id: USER.to_string(),
            display_name: "Ada".to_string(),
            profile_url: String::new(),
            created_at: at(1_600_000_000),
            portfolio: Portfolio {
                cash: Money::from_units(100),
                positions,
            },
        };
        let quotes = HashMap::from([("BTC".to_string(), Money::from_units(50_000))]);

        let entry = service
            .record_portfolio_snapshot(&user, &quotes, at(1_620_061_451))
            .await
            .unwrap();
        assert_eq!(entry.value, Money::from_units(25_100));

        let err = service
            .record_portfolio_snapshot(&user, &HashMap::new(), at(1_620_061_452))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(service.list_valuation_history(USER).await.unwrap().len(), 1);
    }

    // ==================== Store failures ====================

    #[tokio::test]
    async fn test_store_failures_name_operation_and_key() {
        let service = HistoryService::new(Arc::new(BrokenStore));

        let err = service.list_orders("github_42").await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));
        let message = err.to_string();
        assert!(message.contains("list orders users/github_42/orders"), "{message}");
        assert!(message.contains("disk I/O error"), "{message}");

        let err = service
            .rotate_valuation_history("github_42", at(1_000))
            .await
            .unwrap_err();
        assert!(
            err.to_string()
                .contains("scan expired valuations users/github_42/valuations"),
            "{err}"
        );

        let err = service
            .append_order("github_42", &order(at(1_000)))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("append order users/github_42/orders/"), "{err}");

        let err = service
            .record_valuation("github_42", at(1_000), Money::from_units(1))
            .await
            .unwrap_err();
        assert!(
            err.to_string().contains("record valuation users/github_42/valuations/"),
            "{err}"
        );
    }
}

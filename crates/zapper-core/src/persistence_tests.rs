    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use zapper_store::MemoryZapStore;

    const URL: &str = "https://news.example.com/article?id=7";

    fn engine(store: Arc<dyn ZapStore>) -> PersistenceEngine {
        PersistenceEngine::new(store, &ZapConfig::default())
    }

    fn seeded(selectors: &[&str]) -> Arc<dyn ZapStore> {
        Arc::new(MemoryZapStore::with_entries([(
            format!("zapped_{URL}"),
            json!(selectors),
        )]))
    }

    fn add(doc: &mut Document, tag: &str, id: Option<&str>) -> NodeId {
        let el = doc.create_element(tag);
        let body = doc.body();
        doc.append_child(body, el).unwrap();
        if let Some(id) = id {
            doc.set_attribute(el, "id", id).unwrap();
        }
        el
    }

    fn is_hidden(doc: &Document, el: NodeId) -> bool {
        doc.style_property(el, "display") == Some("none")
            && doc.attribute(el, ZAPPED_ATTR) == Some("true")
    }

    /// Accepts reads, fails every write.
    struct ReadOnlyStore;

    #[async_trait]
    impl ZapStore for ReadOnlyStore {
        fn id(&self) -> &str {
            "read-only"
        }

        async fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: Value) -> Result<(), StoreError> {
            Err(StoreError::StorageError("quota exceeded".to_string()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }

        async fn keys(&self) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_record_zap_appends_once() {
        let store = MemoryZapStore::new();
        let key = PageKey::from_url(URL);

        assert!(record_zap(&store, &key, "#ad-123").await.unwrap());
        assert!(record_zap(&store, &key, ".promo").await.unwrap());
        assert!(!record_zap(&store, &key, "#ad-123").await.unwrap());

        let stored = store.get("zapped_https://news.example.com/article?id=7").await.unwrap();
        assert_eq!(stored, Some(json!(["#ad-123", ".promo"])));
    }

    #[tokio::test]
    async fn test_record_zap_keys_by_full_url() {
        let store = MemoryZapStore::new();
        record_zap(&store, &PageKey::from_url(URL), "#a").await.unwrap();
        record_zap(&store, &PageKey::from_url("https://news.example.com/article?id=8"), "#b")
            .await
            .unwrap();

        assert_eq!(store.keys().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_restore_hides_every_match() {
        let mut doc = Document::new(URL);
        let ad = add(&mut doc, "div", Some("ad-123"));
        let first = add(&mut doc, "aside", None);
        let second = add(&mut doc, "aside", None);
        let kept = add(&mut doc, "p", None);

        let engine = engine(seeded(&["#ad-123", "aside"]));
        let report = engine.restore(&mut doc).await.unwrap();

        assert_eq!(report.selectors, 2);
        assert_eq!(report.hidden, 3);
        assert!(report.unmatched.is_empty());
        for el in [ad, first, second] {
            assert!(is_hidden(&doc, el));
        }
        assert!(!is_hidden(&doc, kept));
    }

    #[tokio::test]
    async fn test_restore_skips_bad_and_stale_selectors() {
        let mut doc = Document::new(URL);
        let ad = add(&mut doc, "div", Some("ad-123"));

        let engine = engine(seeded(&["#gone", "div[", "#ad-123"]));
        let report = engine.restore(&mut doc).await.unwrap();

        assert_eq!(report.unmatched, vec!["#gone".to_string()]);
        assert_eq!(report.invalid, vec!["div[".to_string()]);
        assert_eq!(report.hidden, 1);
        assert!(is_hidden(&doc, ad));
    }

    #[tokio::test]
    async fn test_restore_is_idempotent() {
        let mut doc = Document::new(URL);
        let ad = add(&mut doc, "div", Some("ad-123"));
        let engine = engine(seeded(&["#ad-123"]));

        let first = engine.restore(&mut doc).await.unwrap();
        let snapshot = doc.to_snapshot();
        let second = engine.restore(&mut doc).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(doc.to_snapshot(), snapshot);
        assert!(is_hidden(&doc, ad));
    }

    #[tokio::test]
    async fn test_restore_without_record() {
        let mut doc = Document::new(URL);
        add(&mut doc, "div", Some("ad-123"));
        let report = engine(Arc::new(MemoryZapStore::new())).restore(&mut doc).await.unwrap();

        assert_eq!(report.selectors, 0);
        assert_eq!(report.hidden, 0);
        assert_eq!(report.page_key, format!("zapped_{URL}"));
    }

    #[tokio::test]
    async fn test_begin_zap_fades_then_hides() {
        let store: Arc<dyn ZapStore> = Arc::new(MemoryZapStore::new());
        let mut engine = engine(Arc::clone(&store));
        let mut doc = Document::new(URL);
        let mut timers = TimerQueue::new();
        let ad = add(&mut doc, "div", Some("ad-123"));

        engine.begin_zap(&mut doc, &mut timers, ad, "#ad-123".to_string()).unwrap();
        assert_eq!(doc.style_property(ad, "opacity"), Some("0"));
        assert_eq!(doc.style_property(ad, "transition"), Some("opacity 0.2s ease-out"));
        assert!(engine.is_pending(ad));
        assert!(!is_hidden(&doc, ad));

        assert!(timers.pop_due(199).is_none());
        let (_, task) = timers.pop_due(200).unwrap();
        assert_eq!(task, TimerTask::FinishZap { element: ad });
        engine.finish_zap(&mut doc, ad);
        assert!(is_hidden(&doc, ad));
        assert!(!engine.is_pending(ad));

        assert_eq!(engine.settle().await, 0);
        let record = store.load_record(&PageKey::from_url(URL)).await.unwrap();
        assert_eq!(record.selectors, vec!["#ad-123".to_string()]);
    }

    #[tokio::test]
    async fn test_finish_zap_after_removal() {
        let mut engine = engine(Arc::new(MemoryZapStore::new()));
        let mut doc = Document::new(URL);
        let mut timers = TimerQueue::new();
        let ad = add(&mut doc, "div", Some("ad-123"));

        engine.begin_zap(&mut doc, &mut timers, ad, "#ad-123".to_string()).unwrap();
        doc.remove(ad).unwrap();
        engine.finish_zap(&mut doc, ad);

        assert!(!engine.is_pending(ad));
        assert!(!doc.exists(ad));
        engine.settle().await;
    }

    #[tokio::test]
    async fn test_failed_write_does_not_block_hide() {
        let mut engine = engine(Arc::new(ReadOnlyStore));
        let mut doc = Document::new(URL);
        let mut timers = TimerQueue::new();
        let ad = add(&mut doc, "div", Some("ad-123"));

        engine.begin_zap(&mut doc, &mut timers, ad, "#ad-123".to_string()).unwrap();
        assert_eq!(engine.settle().await, 1);

        let (_, task) = timers.pop_due(200).unwrap();
        assert_eq!(task, TimerTask::FinishZap { element: ad });
        engine.finish_zap(&mut doc, ad);
        assert!(is_hidden(&doc, ad));
    }

    #[tokio::test]
    async fn test_transition_follows_config() {
        let mut engine = PersistenceEngine::new(
            Arc::new(MemoryZapStore::new()),
            &ZapConfig { transition_ms: 350 },
        );
        let mut doc = Document::new(URL);
        let mut timers = TimerQueue::new();
        let ad = add(&mut doc, "div", None);

        engine.begin_zap(&mut doc, &mut timers, ad, "div".to_string()).unwrap();
        assert_eq!(doc.style_property(ad, "transition"), Some("opacity 0.35s ease-out"));
        assert!(timers.pop_due(349).is_none());
        assert!(timers.pop_due(350).is_some());
        engine.settle().await;
    }

    #[tokio::test]
    async fn test_finished_writes_are_reaped() {
        let mut engine = engine(Arc::new(ReadOnlyStore));
        let mut doc = Document::new(URL);
        let mut timers = TimerQueue::new();
        let first = add(&mut doc, "div", Some("first"));
        let second = add(&mut doc, "div", Some("second"));

        engine.begin_zap(&mut doc, &mut timers, first, "#first".to_string()).unwrap();
        while engine.pending_writes() > 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(engine.writes.len(), 1);

        engine.begin_zap(&mut doc, &mut timers, second, "#second".to_string()).unwrap();
        assert_eq!(engine.writes.len(), 1);
        assert_eq!(engine.settle().await, 2);
        assert_eq!(engine.settle().await, 0);
    }

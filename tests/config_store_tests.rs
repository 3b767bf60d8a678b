#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use refconsole::app::apps::{AppFieldsUpdate, NewApp};
    use refconsole::app::config_cache::ConfigCache;
    use refconsole::app::config_store::{ConfigStore, MemoryConfigStore, StoreError};
    use serde_json::json;

    fn demo_fields() -> NewApp {
        NewApp {
            app_name: "Demo".to_string(),
            package_name: "com.demo.x".to_string(),
            app_description: "d".to_string(),
        }
    }

    #[test]
    fn test_create_assigns_nonempty_unique_id() {
        let store = MemoryConfigStore::new();
        let first = store.create_app(&demo_fields()).unwrap();
        let second = store.create_app(&demo_fields()).unwrap();

        assert!(!first.app_id.is_empty());
        assert!(!second.app_id.is_empty());
        assert_ne!(first.app_id, second.app_id);
        assert_eq!(first.app_name, "Demo");
        assert_eq!(first.meta.description, "d");
    }

    #[test]
    fn test_get_config_before_any_save_returns_default_tree() {
        let store = MemoryConfigStore::new();
        let app = store.create_app(&demo_fields()).unwrap();

        // A fresh app has an empty tree, not an error
        let tree = store.get_config(&app.app_id).unwrap();
        assert_eq!(tree, json!({}));
    }

    #[test]
    fn test_save_then_get_round_trips() {
        let store = MemoryConfigStore::new();
        let app = store.create_app(&demo_fields()).unwrap();

        let tree = json!({"hero": {"title": "T"}, "notifications": {"enabled": true}});
        let receipt = store.save_config(&app.app_id, &tree).unwrap();
        assert!(receipt.saved);

        assert_eq!(store.get_config(&app.app_id).unwrap(), tree);
    }

    #[test]
    fn test_last_writer_wins() {
        let store = MemoryConfigStore::new();
        let app = store.create_app(&demo_fields()).unwrap();

        store
            .save_config(&app.app_id, &json!({"v": 1}))
            .unwrap();
        store
            .save_config(&app.app_id, &json!({"v": 2}))
            .unwrap();
        // No conflict surfaced; the second save silently wins
        assert_eq!(store.get_config(&app.app_id).unwrap(), json!({"v": 2}));
    }

    #[test]
    fn test_validation_failure_on_missing_required_fields() {
        let store = MemoryConfigStore::new();
        let err = store
            .create_app(&NewApp {
                app_name: String::new(),
                package_name: "com.demo.x".to_string(),
                app_description: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.list_apps().unwrap().is_empty());
    }

    #[test]
    fn test_not_found_taxonomy() {
        let store = MemoryConfigStore::new();

        assert!(matches!(
            store.get_config("missing").unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            store.save_config("missing", &json!({})).unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            store.delete_app("missing").unwrap_err(),
            StoreError::NotFound(_)
        ));
        assert!(matches!(
            store
                .update_app("missing", &AppFieldsUpdate::default())
                .unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[test]
    fn test_partial_update_leaves_other_fields() {
        let store = MemoryConfigStore::new();
        let app = store.create_app(&demo_fields()).unwrap();

        let updated = store
            .update_app(
                &app.app_id,
                &AppFieldsUpdate {
                    description: Some("new description".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.app_name, "Demo");
        assert_eq!(updated.package_name, "com.demo.x");
        assert_eq!(updated.meta.description, "new description");
    }

    #[test]
    fn test_delete_removes_app_and_config() {
        let store = MemoryConfigStore::new();
        let app = store.create_app(&demo_fields()).unwrap();
        store.save_config(&app.app_id, &json!({"x": 1})).unwrap();

        store.delete_app(&app.app_id).unwrap();
        assert!(store.list_apps().unwrap().is_empty());
        assert!(matches!(
            store.get_config(&app.app_id).unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[test]
    fn test_retryability_follows_taxonomy() {
        assert!(StoreError::Network("down".to_string()).is_retryable());
        assert!(!StoreError::Validation("bad".to_string()).is_retryable());
        assert!(!StoreError::NotFound("gone".to_string()).is_retryable());
    }

    #[test]
    fn test_cache_invalidation_after_save() {
        let store = MemoryConfigStore::new();
        let cache = ConfigCache::new();
        let app = store.create_app(&demo_fields()).unwrap();

        let tree = store.get_config(&app.app_id).unwrap();
        cache.insert(&app.app_id, tree);
        assert!(cache.get(&app.app_id).is_some());

        // After a save the store copy changed; the cached tree is dropped
        store
            .save_config(&app.app_id, &json!({"hero": {"title": "T"}}))
            .unwrap();
        cache.invalidate(&app.app_id);
        assert!(cache.get(&app.app_id).is_none());
    }
}

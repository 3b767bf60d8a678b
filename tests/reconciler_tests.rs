#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use refconsole::app::apps::NewApp;
    use refconsole::app::config_store::{ConfigStore, MemoryConfigStore, StoreError};
    use refconsole::app::config_tree::EditPath;
    use refconsole::app::reconciler::{ConfigReconciler, SwitchRequest, SyncState};
    use serde_json::json;

    fn store_with_app(name: &str) -> (MemoryConfigStore, String) {
        let store = MemoryConfigStore::new();
        let app = store
            .create_app(&NewApp {
                app_name: name.to_string(),
                package_name: format!("com.example.{}", name.to_lowercase()),
                app_description: "d".to_string(),
            })
            .expect("create app");
        let app_id = app.app_id;
        (store, app_id)
    }

    #[test]
    fn test_load_starts_clean() {
        let mut reconciler = ConfigReconciler::new();
        reconciler.load("a1", json!({"hero": {"title": "T"}}));
        assert_eq!(reconciler.state(), SyncState::Clean);
        assert!(!reconciler.has_unsaved_changes());
    }

    #[test]
    fn test_edit_save_then_discard_is_noop() {
        let (store, app_id) = store_with_app("Demo");
        let mut reconciler = ConfigReconciler::new();
        reconciler.load(&app_id, store.get_config(&app_id).unwrap());

        reconciler.apply_edit(&EditPath::parse("hero.title"), json!("New Title"));
        assert_eq!(reconciler.state(), SyncState::Dirty);

        let payload = reconciler.begin_save().expect("save payload");
        // The store receives a tree whose edited path carries the new value
        assert_eq!(payload.tree["hero"]["title"], json!("New Title"));

        let result = store.save_config(&payload.app_id, &payload.tree).map(|_| ());
        reconciler.complete_save(&payload.tree, result);
        assert_eq!(reconciler.state(), SyncState::Clean);

        // Discard after a successful save changes nothing
        reconciler.discard();
        assert_eq!(reconciler.state(), SyncState::Clean);
        assert_eq!(reconciler.current()["hero"]["title"], json!("New Title"));

        // And the persisted copy matches
        assert_eq!(
            store.get_config(&app_id).unwrap()["hero"]["title"],
            json!("New Title")
        );
    }

    #[test]
    fn test_noop_tree_edit_does_not_dirty() {
        let mut reconciler = ConfigReconciler::new();
        reconciler.load("a1", json!({"hero": {"title": "Same"}}));

        // Writing the existing value back over itself through the tree
        // path, with no explicit edit flag, must not flip Clean to Dirty.
        reconciler.apply_edit(&EditPath::parse("hero.title"), json!("Same"));
        assert_eq!(reconciler.state(), SyncState::Clean);
    }

    #[test]
    fn test_side_channel_edit_keeps_dirty_even_with_equal_trees() {
        let mut reconciler = ConfigReconciler::new();
        reconciler.load("a1", json!({"hero": {"title": "T"}}));

        reconciler.edit_details(|draft| draft.description = Some("new copy".to_string()));
        // Trees are identical but the explicit flag keeps the state dirty
        assert!(reconciler.has_unsaved_changes());
        assert_eq!(reconciler.state(), SyncState::Dirty);

        // An edit that restores tree equality still leaves Dirty because
        // the side-channel write is pending
        reconciler.apply_edit(&EditPath::parse("hero.title"), json!("X"));
        reconciler.apply_edit(&EditPath::parse("hero.title"), json!("T"));
        assert_eq!(reconciler.state(), SyncState::Dirty);
    }

    #[test]
    fn test_failed_save_returns_to_error_and_is_retriable() {
        let mut reconciler = ConfigReconciler::new();
        reconciler.load("a1", json!({"hero": {"title": "T"}}));
        reconciler.apply_edit(&EditPath::parse("hero.title"), json!("Edited"));

        let payload = reconciler.begin_save().unwrap();
        reconciler.complete_save(
            &payload.tree,
            Err(StoreError::Network("store unreachable".to_string())),
        );

        assert_eq!(reconciler.state(), SyncState::Error);
        // Edits preserved
        assert_eq!(reconciler.current()["hero"]["title"], json!("Edited"));

        // Re-triggerable with the same payload
        let retry = reconciler.begin_save().expect("retry allowed");
        assert_eq!(retry.tree, payload.tree);
        reconciler.complete_save(&retry.tree, Ok(()));
        assert_eq!(reconciler.state(), SyncState::Clean);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut reconciler = ConfigReconciler::new();
        reconciler.load("a1", json!({"hero": {"title": "T"}}));
        reconciler.apply_edit(&EditPath::parse("hero.title"), json!("Edited"));
        reconciler.edit_details(|draft| draft.app_name = Some("N".to_string()));

        reconciler.discard();
        assert_eq!(reconciler.state(), SyncState::Clean);
        assert_eq!(reconciler.current()["hero"]["title"], json!("T"));
        assert!(reconciler.details_draft().is_empty());

        // Second discard in a row: no error, state stays Clean
        reconciler.discard();
        assert_eq!(reconciler.state(), SyncState::Clean);
    }

    #[test]
    fn test_switch_gate_scenario_two_dirty_apps() {
        let (store, app_a) = store_with_app("Alpha");
        let app_b = store
            .create_app(&NewApp {
                app_name: "Beta".to_string(),
                package_name: "com.example.beta".to_string(),
                app_description: String::new(),
            })
            .unwrap()
            .app_id;

        let mut reconciler = ConfigReconciler::new();
        reconciler.load(&app_a, store.get_config(&app_a).unwrap());
        reconciler.apply_edit(&EditPath::parse("hero.title"), json!("A edit"));

        // Selecting B while A is dirty raises the confirmation gate
        assert_eq!(
            reconciler.request_switch(&app_b),
            SwitchRequest::NeedsConfirmation
        );

        // Cancelling leaves A's working copy and selection intact
        reconciler.cancel_switch();
        assert_eq!(reconciler.app_id(), Some(app_a.as_str()));
        assert_eq!(reconciler.current()["hero"]["title"], json!("A edit"));
        assert_eq!(reconciler.state(), SyncState::Dirty);

        // Confirming resets everything and yields the target to load
        assert_eq!(
            reconciler.request_switch(&app_b),
            SwitchRequest::NeedsConfirmation
        );
        let target = reconciler.confirm_switch().expect("switch target");
        assert_eq!(target, app_b);

        reconciler.load(&app_b, store.get_config(&app_b).unwrap());
        assert_eq!(reconciler.state(), SyncState::Clean);
    }

    #[test]
    fn test_reselecting_current_app_never_gates() {
        let mut reconciler = ConfigReconciler::new();
        reconciler.load("a1", json!({}));
        reconciler.apply_edit(&EditPath::parse("x"), json!(1));
        assert_eq!(reconciler.request_switch("a1"), SwitchRequest::Granted);
    }

    #[test]
    fn test_save_payload_carries_details_draft() {
        let (store, app_id) = store_with_app("Demo");
        let mut reconciler = ConfigReconciler::new();
        reconciler.load(&app_id, store.get_config(&app_id).unwrap());

        reconciler.edit_details(|draft| draft.play_url = Some("https://play".to_string()));
        let payload = reconciler.begin_save().unwrap();
        let details = payload.details.expect("details draft present");
        assert_eq!(details.play_url.as_deref(), Some("https://play"));

        // Apply the update then the tree save, as the app loop does
        store.update_app(&payload.app_id, &details).unwrap();
        let result = store.save_config(&payload.app_id, &payload.tree).map(|_| ());
        reconciler.complete_save(&payload.tree, result);

        assert_eq!(reconciler.state(), SyncState::Clean);
        assert!(reconciler.details_draft().is_empty());
        let apps = store.list_apps().unwrap();
        assert_eq!(apps[0].meta.play_url, "https://play");
    }
}

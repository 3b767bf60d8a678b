#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use refconsole::app::config_tree::{
        apply_edit, classify, humanize_key, trees_equal, value_at, EditPath, FieldValue,
    };
    use serde_json::json;

    #[test]
    fn test_apply_edit_read_back() {
        let root = json!({
            "hero": {"title": "Old", "enabled": true},
            "slides": [{"caption": "one"}, {"caption": "two"}],
        });

        let path = EditPath::parse("slides.1.caption");
        let out = apply_edit(&root, &path, json!("TWO"));

        assert_eq!(value_at(&out, &path), Some(&json!("TWO")));
        // Untouched branches are preserved
        assert_eq!(out["hero"]["title"], json!("Old"));
        assert_eq!(out["slides"][0]["caption"], json!("one"));
    }

    #[test]
    fn test_apply_edit_never_mutates_input() {
        let root = json!({"a": {"b": 1}});
        let snapshot = serde_json::to_string(&root).unwrap();

        let _ = apply_edit(&root, &EditPath::parse("a.b"), json!(2));
        let _ = apply_edit(&root, &EditPath::parse("a.c.d"), json!(3));
        let _ = apply_edit(&root, &EditPath::parse("x.0.y"), json!(4));

        assert_eq!(serde_json::to_string(&root).unwrap(), snapshot);
    }

    #[test]
    fn test_noop_edit_is_structurally_equal() {
        let root = json!({"hero": {"title": "Same"}, "count": 3});
        let path = EditPath::parse("hero.title");

        let existing = value_at(&root, &path).cloned().unwrap();
        let out = apply_edit(&root, &path, existing);

        assert!(trees_equal(&root, &out));
        assert_eq!(
            serde_json::to_string(&root).unwrap(),
            serde_json::to_string(&out).unwrap()
        );
    }

    #[test]
    fn test_round_trip_restores_original_value() {
        let root = json!({"hero": {"title": "Original"}});
        let path = EditPath::parse("hero.title");

        let original_value = value_at(&root, &path).cloned().unwrap();
        let edited = apply_edit(&root, &path, json!("Changed"));
        let restored = apply_edit(&edited, &path, original_value);

        assert_eq!(value_at(&restored, &path), value_at(&root, &path));
        assert!(trees_equal(&root, &restored));
    }

    #[test]
    fn test_edit_at_absent_path_creates_mappings() {
        let root = json!({});
        let out = apply_edit(&root, &EditPath::parse("page1.hero.title"), json!("T"));
        assert_eq!(out, json!({"page1": {"hero": {"title": "T"}}}));
    }

    #[test]
    fn test_edit_through_scalar_replaces_it_with_mapping() {
        let root = json!({"page1": "oops"});
        let out = apply_edit(&root, &EditPath::parse("page1.title"), json!("T"));
        assert_eq!(out, json!({"page1": {"title": "T"}}));
    }

    #[test]
    fn test_edit_at_root_replaces_tree() {
        let root = json!({"old": true});
        let out = apply_edit(&root, &EditPath::root(), json!({"new": true}));
        assert_eq!(out, json!({"new": true}));
    }

    #[test]
    fn test_classification_variants() {
        assert_eq!(classify("enabled", &json!(false)), FieldValue::Bool(false));
        assert_eq!(classify("maxInvites", &json!(10)), FieldValue::Number(10.0));
        assert_eq!(
            classify("title", &json!("Welcome")),
            FieldValue::Text("Welcome".to_string())
        );

        match classify("steps", &json!(["a", "b"])) {
            FieldValue::Array(items) => assert_eq!(items.len(), 2),
            other => panic!("expected array classification, got {:?}", other),
        }

        match classify("hero", &json!({"title": "T"})) {
            FieldValue::Object(fields) => {
                assert_eq!(fields[0].0, "title");
                assert_eq!(fields[0].1, FieldValue::Text("T".to_string()));
            }
            other => panic!("expected object classification, got {:?}", other),
        }
    }

    #[test]
    fn test_long_text_heuristics() {
        // Key-name heuristic, case-insensitive substring
        assert!(matches!(
            classify("appDescription", &json!("x")),
            FieldValue::LongText(_)
        ));
        assert!(matches!(
            classify("welcome_message", &json!("x")),
            FieldValue::LongText(_)
        ));
        assert!(matches!(
            classify("legalBody", &json!("x")),
            FieldValue::LongText(_)
        ));

        // Length heuristic wins even for a neutral key
        let long = "y".repeat(120);
        assert!(matches!(
            classify("title", &json!(long)),
            FieldValue::LongText(_)
        ));

        // Neither heuristic
        assert!(matches!(
            classify("title", &json!("short")),
            FieldValue::Text(_)
        ));
    }

    #[test]
    fn test_absent_value_defaults() {
        let root = json!({"hero": {}});
        assert_eq!(value_at(&root, &EditPath::parse("hero.title")), None);

        // The editor falls back to an empty default instead of panicking
        let fallback = classify("title", &serde_json::Value::Null);
        assert_eq!(fallback, FieldValue::Text(String::new()));
        assert_eq!(FieldValue::Bool(true).empty_like(), FieldValue::Bool(false));
        assert_eq!(
            FieldValue::Number(7.0).empty_like(),
            FieldValue::Number(0.0)
        );
        assert_eq!(
            FieldValue::Array(vec![FieldValue::Bool(true)]).empty_like(),
            FieldValue::Array(vec![])
        );
    }

    #[test]
    fn test_humanization_transform() {
        assert_eq!(humanize_key("appStoreUrl"), "App Store URL");
        assert_eq!(humanize_key("referral_id"), "Referral ID");
        assert_eq!(humanize_key("shareCta"), "Share CTA");
        assert_eq!(humanize_key("faq"), "FAQ");
        assert_eq!(humanize_key("page-title"), "Page Title");
        assert_eq!(humanize_key("notifications"), "Notifications");
    }

    #[test]
    fn test_field_value_json_round_trip() {
        let tree = json!({
            "enabled": true,
            "count": 5,
            "title": "T",
            "nested": {"items": [1, 2]},
        });
        let classified = classify("root", &tree);
        assert_eq!(classified.to_json(), tree);
    }
}

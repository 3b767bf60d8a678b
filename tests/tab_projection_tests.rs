#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use refconsole::app::tab_projection::{
        default_image_shape, project_tabs, tab_subtree, tab_title, Tab, CANONICAL_TAB_ORDER,
    };
    use serde_json::json;

    #[test]
    fn test_spec_ordering_example() {
        let tree = json!({
            "notifications": {"enabled": true},
            "page2_referralStatus": {"title": "Status"},
            "customX": {"foo": 1},
        });
        let tabs = project_tabs(&tree);
        let keys: Vec<&str> = tabs.iter().map(|t| t.key()).collect();
        assert_eq!(
            keys,
            vec![
                "page2_referralStatus",
                "notifications",
                "image",
                "app-details",
                "customX"
            ]
        );
    }

    #[test]
    fn test_canonical_keys_keep_canonical_order() {
        let tree = json!({
            "terms": {},
            "faq": {},
            "page1_referralPromote": {},
        });
        let keys: Vec<String> = project_tabs(&tree)
            .iter()
            .map(|t| t.key().to_string())
            .collect();
        assert_eq!(
            keys,
            vec![
                "page1_referralPromote",
                "faq",
                "terms",
                "image",
                "app-details"
            ]
        );
    }

    #[test]
    fn test_unknown_keys_keep_tree_order() {
        let tree = json!({
            "zeta": {},
            "alpha": {},
            "notifications": {},
        });
        let keys: Vec<String> = project_tabs(&tree)
            .iter()
            .map(|t| t.key().to_string())
            .collect();
        // Unknowns come after the pseudo-tabs, in insertion order, not
        // sorted alphabetically.
        assert_eq!(
            keys,
            vec!["notifications", "image", "app-details", "zeta", "alpha"]
        );
    }

    #[test]
    fn test_pseudo_tabs_always_present() {
        let tabs = project_tabs(&json!({}));
        assert!(tabs.contains(&Tab::Image));
        assert!(tabs.contains(&Tab::AppDetails));

        // Even for a non-object tree
        let tabs = project_tabs(&json!(null));
        assert_eq!(tabs, vec![Tab::Image, Tab::AppDetails]);
    }

    #[test]
    fn test_colliding_keys_are_shadowed_by_pseudo_tabs() {
        let tree = json!({
            "images": {"headerImageUrl": "h"},
            "appDetails": {"name": "bogus"},
            "notifications": {},
        });
        let tabs = project_tabs(&tree);
        let image_count = tabs.iter().filter(|t| t.key() == "image").count();
        let details_count = tabs.iter().filter(|t| t.key() == "app-details").count();
        assert_eq!(image_count, 1);
        assert_eq!(details_count, 1);
        assert!(!tabs.iter().any(|t| t.key() == "images"));
        assert!(!tabs.iter().any(|t| t.key() == "appDetails"));
    }

    #[test]
    fn test_image_tab_projects_reserved_subtree() {
        let tree = json!({"images": {"shareImageUrl": "s"}});
        assert_eq!(
            tab_subtree(&tree, &Tab::Image),
            json!({"shareImageUrl": "s"})
        );

        // Synthesized empty default shape when the subtree is absent
        assert_eq!(tab_subtree(&json!({}), &Tab::Image), default_image_shape());
    }

    #[test]
    fn test_app_details_tab_is_not_tree_backed() {
        assert!(!Tab::AppDetails.edits_tree());
        assert_eq!(Tab::AppDetails.tree_key(), None);
        assert_eq!(Tab::Image.tree_key(), Some("images"));
    }

    #[test]
    fn test_titles_static_then_humanized() {
        assert_eq!(
            tab_title(&Tab::Config("page2_referralStatus".to_string())),
            "Referral Status"
        );
        assert_eq!(tab_title(&Tab::Config("faq".to_string())), "FAQ");
        assert_eq!(tab_title(&Tab::Image), "Image");
        assert_eq!(tab_title(&Tab::AppDetails), "App Details");
        // Unmapped keys fall back to humanization
        assert_eq!(
            tab_title(&Tab::Config("winterPromoBanner".to_string())),
            "Winter Promo Banner"
        );
    }

    #[test]
    fn test_canonical_order_is_stable() {
        // The ordering contract other components rely on
        let promote = CANONICAL_TAB_ORDER
            .iter()
            .position(|k| *k == "page1_referralPromote")
            .unwrap();
        let status = CANONICAL_TAB_ORDER
            .iter()
            .position(|k| *k == "page2_referralStatus")
            .unwrap();
        let notifications = CANONICAL_TAB_ORDER
            .iter()
            .position(|k| *k == "notifications")
            .unwrap();
        assert!(promote < status);
        assert!(status < notifications);
    }
}

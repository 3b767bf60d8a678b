//! App records managed by the console.
//!
//! An [`App`] is one mobile application whose referral campaign is being
//! configured. The record itself (name, package, store links) lives beside
//! the campaign config tree in the config store and is edited through the
//! `App Details` tab rather than through the tree editor.

use serde::{Deserialize, Serialize};

/// Store-level links and description for an app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppMeta {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub play_url: String,
    #[serde(default)]
    pub app_store_url: String,
}

/// One mobile app registered in the config store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    /// Unique identifier assigned by the store on creation.
    pub app_id: String,
    pub app_name: String,
    pub package_name: String,
    #[serde(default)]
    pub meta: AppMeta,
}

/// Fields supplied when registering a new app.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApp {
    pub app_name: String,
    pub package_name: String,
    #[serde(default)]
    pub app_description: String,
}

impl NewApp {
    /// Required-field validation applied before the store is called.
    pub fn validate(&self) -> Result<(), String> {
        if self.app_name.trim().is_empty() {
            return Err("App name is required".to_string());
        }
        if self.package_name.trim().is_empty() {
            return Err("Package name is required".to_string());
        }
        Ok(())
    }
}

/// Partial update of an [`App`]. Only populated fields are written, so the
/// same struct serves as the buffer for unsaved `App Details` edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppFieldsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_store_url: Option<String>,
}

impl AppFieldsUpdate {
    pub fn is_empty(&self) -> bool {
        self.app_name.is_none()
            && self.package_name.is_none()
            && self.description.is_none()
            && self.play_url.is_none()
            && self.app_store_url.is_none()
    }

    /// Apply the populated fields to an app record in place.
    pub fn apply_to(&self, app: &mut App) {
        if let Some(name) = &self.app_name {
            app.app_name = name.clone();
        }
        if let Some(package) = &self.package_name {
            app.package_name = package.clone();
        }
        if let Some(description) = &self.description {
            app.meta.description = description.clone();
        }
        if let Some(play_url) = &self.play_url {
            app.meta.play_url = play_url.clone();
        }
        if let Some(app_store_url) = &self.app_store_url {
            app.meta.app_store_url = app_store_url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_app_requires_name_and_package() {
        let mut fields = NewApp {
            app_name: "Demo".to_string(),
            package_name: "com.demo.x".to_string(),
            app_description: String::new(),
        };
        assert!(fields.validate().is_ok());

        fields.app_name = "  ".to_string();
        assert!(fields.validate().is_err());

        fields.app_name = "Demo".to_string();
        fields.package_name = String::new();
        assert!(fields.validate().is_err());
    }

    #[test]
    fn partial_update_touches_only_populated_fields() {
        let mut app = App {
            app_id: "a1".to_string(),
            app_name: "Demo".to_string(),
            package_name: "com.demo.x".to_string(),
            meta: AppMeta {
                description: "d".to_string(),
                play_url: "p".to_string(),
                app_store_url: "s".to_string(),
            },
        };
        let update = AppFieldsUpdate {
            app_name: Some("Demo 2".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        update.apply_to(&mut app);
        assert_eq!(app.app_name, "Demo 2");
        assert_eq!(app.package_name, "com.demo.x");
        assert_eq!(app.meta.description, "d");
    }
}

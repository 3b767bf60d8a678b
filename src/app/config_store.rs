//! Config store collaborator.
//!
//! The store persists [`App`] records and one campaign config tree per app,
//! keyed by app id. The console only ever talks to it through the
//! [`ConfigStore`] trait; [`HttpConfigStore`] is the production client and
//! [`MemoryConfigStore`] backs offline use and tests.
//!
//! Saves are last-writer-wins: the store performs no optimistic-concurrency
//! check, so a concurrent save from another session is silently overwritten.
//! That is a deliberate policy, not a detected error, which is why the
//! [`StoreError`] taxonomy has no conflict variant.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};
use url::Url;

use crate::app::apps::{App, AppFieldsUpdate, AppMeta, NewApp};

/// Failure taxonomy for the store and generation collaborators. Every
/// variant is surfaced to the user as a dismissible notification; none is
/// fatal to the application.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Service unreachable or a non-success status with no better mapping.
    Network(String),
    /// Rejected input: malformed JSON, missing required fields.
    Validation(String),
    /// The addressed app id is absent from the store.
    NotFound(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Network(msg) => write!(f, "network failure: {}", msg),
            StoreError::Validation(msg) => write!(f, "validation failure: {}", msg),
            StoreError::NotFound(msg) => write!(f, "not found: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    /// Whether re-running the same operation could plausibly succeed.
    /// Drives the retry action on notifications.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Network(_))
    }
}

/// Acknowledgement returned by a successful config save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReceipt {
    pub saved: bool,
    pub revised_at: DateTime<Utc>,
}

/// Contract consumed by the reconciler and the CRUD windows.
pub trait ConfigStore: Send + Sync {
    fn list_apps(&self) -> Result<Vec<App>, StoreError>;

    /// Register a new app. The store assigns the unique `app_id`.
    fn create_app(&self, fields: &NewApp) -> Result<App, StoreError>;

    /// Partial-field update; unpopulated fields are left untouched.
    fn update_app(&self, app_id: &str, fields: &AppFieldsUpdate) -> Result<App, StoreError>;

    fn delete_app(&self, app_id: &str) -> Result<(), StoreError>;

    /// Fetch the config tree for an app. An app that has never been saved
    /// has an empty tree, not an error.
    fn get_config(&self, app_id: &str) -> Result<Value, StoreError>;

    /// Persist the full config tree. Last writer wins.
    fn save_config(&self, app_id: &str, tree: &Value) -> Result<SaveReceipt, StoreError>;
}

/// HTTP client for the referral config backend.
///
/// Endpoints: `GET/POST {base}/apps`, `PATCH/DELETE {base}/apps/{id}`,
/// `GET/PUT {base}/apps/{id}/config`. All calls are blocking and are made
/// from worker threads, never from the UI thread.
pub struct HttpConfigStore {
    base_url: Url,
    client: reqwest::blocking::Client,
}

impl HttpConfigStore {
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StoreError::Validation(format!("invalid store URL: {}", e)))?;
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| StoreError::Validation("store URL cannot be a base".to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Map a non-success response onto the failure taxonomy.
    fn error_for(response: reqwest::blocking::Response) -> StoreError {
        let status = response.status();
        let body = response.text().unwrap_or_default();
        let detail = if body.is_empty() {
            status.to_string()
        } else {
            format!("{}: {}", status, body)
        };
        if status == reqwest::StatusCode::NOT_FOUND {
            StoreError::NotFound(detail)
        } else if status.is_client_error() {
            StoreError::Validation(detail)
        } else {
            StoreError::Network(detail)
        }
    }

    fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<T, StoreError> {
        if !response.status().is_success() {
            return Err(Self::error_for(response));
        }
        response
            .json::<T>()
            .map_err(|e| StoreError::Network(format!("malformed store response: {}", e)))
    }
}

impl ConfigStore for HttpConfigStore {
    fn list_apps(&self) -> Result<Vec<App>, StoreError> {
        let url = self.endpoint(&["apps"])?;
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Self::decode(response)
    }

    fn create_app(&self, fields: &NewApp) -> Result<App, StoreError> {
        fields.validate().map_err(StoreError::Validation)?;
        let url = self.endpoint(&["apps"])?;
        let response = self
            .client
            .post(url)
            .json(fields)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let app: App = Self::decode(response)?;
        info!("created app {} ({})", app.app_name, app.app_id);
        Ok(app)
    }

    fn update_app(&self, app_id: &str, fields: &AppFieldsUpdate) -> Result<App, StoreError> {
        let url = self.endpoint(&["apps", app_id])?;
        let response = self
            .client
            .patch(url)
            .json(fields)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Self::decode(response)
    }

    fn delete_app(&self, app_id: &str) -> Result<(), StoreError> {
        let url = self.endpoint(&["apps", app_id])?;
        let response = self
            .client
            .delete(url)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(Self::error_for(response));
        }
        info!("deleted app {}", app_id);
        Ok(())
    }

    fn get_config(&self, app_id: &str) -> Result<Value, StoreError> {
        let url = self.endpoint(&["apps", app_id, "config"])?;
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Self::decode(response)
    }

    fn save_config(&self, app_id: &str, tree: &Value) -> Result<SaveReceipt, StoreError> {
        let url = self.endpoint(&["apps", app_id, "config"])?;
        let response = self
            .client
            .put(url)
            .json(tree)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let receipt: SaveReceipt = Self::decode(response)?;
        info!("saved config for {} at {}", app_id, receipt.revised_at);
        Ok(receipt)
    }
}

/// In-memory store used when no backend URL is configured, and as the
/// collaborator double in tests. Same contract as the HTTP client,
/// including the empty-tree default for never-saved apps.
#[derive(Default)]
pub struct MemoryConfigStore {
    records: Mutex<MemoryRecords>,
}

#[derive(Default)]
struct MemoryRecords {
    apps: Vec<App>,
    configs: HashMap<String, Value>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryRecords> {
        // A poisoned lock means a panic mid-mutation; the records are
        // plain data, so continuing with them is safe.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ConfigStore for MemoryConfigStore {
    fn list_apps(&self) -> Result<Vec<App>, StoreError> {
        Ok(self.lock().apps.clone())
    }

    fn create_app(&self, fields: &NewApp) -> Result<App, StoreError> {
        fields.validate().map_err(StoreError::Validation)?;
        let app = App {
            app_id: uuid::Uuid::new_v4().to_string(),
            app_name: fields.app_name.clone(),
            package_name: fields.package_name.clone(),
            meta: AppMeta {
                description: fields.app_description.clone(),
                ..Default::default()
            },
        };
        self.lock().apps.push(app.clone());
        Ok(app)
    }

    fn update_app(&self, app_id: &str, fields: &AppFieldsUpdate) -> Result<App, StoreError> {
        let mut records = self.lock();
        let app = records
            .apps
            .iter_mut()
            .find(|a| a.app_id == app_id)
            .ok_or_else(|| StoreError::NotFound(format!("app {}", app_id)))?;
        fields.apply_to(app);
        Ok(app.clone())
    }

    fn delete_app(&self, app_id: &str) -> Result<(), StoreError> {
        let mut records = self.lock();
        let before = records.apps.len();
        records.apps.retain(|a| a.app_id != app_id);
        if records.apps.len() == before {
            return Err(StoreError::NotFound(format!("app {}", app_id)));
        }
        records.configs.remove(app_id);
        Ok(())
    }

    fn get_config(&self, app_id: &str) -> Result<Value, StoreError> {
        let records = self.lock();
        if !records.apps.iter().any(|a| a.app_id == app_id) {
            return Err(StoreError::NotFound(format!("app {}", app_id)));
        }
        Ok(records
            .configs
            .get(app_id)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new())))
    }

    fn save_config(&self, app_id: &str, tree: &Value) -> Result<SaveReceipt, StoreError> {
        let mut records = self.lock();
        if !records.apps.iter().any(|a| a.app_id == app_id) {
            warn!("save for unknown app {}", app_id);
            return Err(StoreError::NotFound(format!("app {}", app_id)));
        }
        records.configs.insert(app_id.to_string(), tree.clone());
        Ok(SaveReceipt {
            saved: true,
            revised_at: Utc::now(),
        })
    }
}

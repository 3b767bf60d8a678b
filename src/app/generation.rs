//! Content generation and translation collaborator.
//!
//! The generation service can rewrite the content of a single tab
//! (`regenerate_tab`) or produce a translated copy of the whole config
//! for a language (`translate`). Both are fire-and-forget from the UI's
//! point of view: each carries a pending flag keyed by tab or language
//! code, several distinct targets may be in flight at once, and
//! re-dispatching an already-pending target is suppressed.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use url::Url;

use crate::app::config_store::StoreError;

/// Replacement content for one tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRegeneration {
    pub tab_key: String,
    pub new_subtree: Value,
}

/// Acknowledgement of a translation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationStatus {
    pub language_code: String,
    pub status: String,
}

pub trait GenerationService: Send + Sync {
    /// Ask the service to rewrite one tab's subtree. App name and
    /// description give the generator context when available.
    fn regenerate_tab(
        &self,
        app_id: &str,
        tab_key: &str,
        current_subtree: &Value,
        app_name: Option<&str>,
        app_description: Option<&str>,
    ) -> Result<TabRegeneration, StoreError>;

    /// Queue a translation of the full config into one language.
    fn translate(
        &self,
        app_id: &str,
        language_code: &str,
        full_config: &Value,
    ) -> Result<TranslationStatus, StoreError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegenerateRequest<'a> {
    tab_key: &'a str,
    current_subtree: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_description: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranslateRequest<'a> {
    language_code: &'a str,
    config: &'a Value,
}

/// HTTP client for the generation backend. Blocking, worker-thread only,
/// same error mapping as the config store client.
pub struct HttpGenerationService {
    base_url: Url,
    client: reqwest::blocking::Client,
}

impl HttpGenerationService {
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StoreError::Validation(format!("invalid generation URL: {}", e)))?;
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                StoreError::Validation("generation URL cannot be a base".to_string())
            })?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<T, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let detail = if body.is_empty() {
                status.to_string()
            } else {
                format!("{}: {}", status, body)
            };
            return Err(if status == reqwest::StatusCode::NOT_FOUND {
                StoreError::NotFound(detail)
            } else if status.is_client_error() {
                StoreError::Validation(detail)
            } else {
                StoreError::Network(detail)
            });
        }
        response
            .json::<T>()
            .map_err(|e| StoreError::Network(format!("malformed generation response: {}", e)))
    }
}

impl GenerationService for HttpGenerationService {
    fn regenerate_tab(
        &self,
        app_id: &str,
        tab_key: &str,
        current_subtree: &Value,
        app_name: Option<&str>,
        app_description: Option<&str>,
    ) -> Result<TabRegeneration, StoreError> {
        let url = self.endpoint(&["apps", app_id, "regenerate"])?;
        let request = RegenerateRequest {
            tab_key,
            current_subtree,
            app_name,
            app_description,
        };
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let regeneration: TabRegeneration = Self::decode(response)?;
        info!("regenerated tab {} for app {}", regeneration.tab_key, app_id);
        Ok(regeneration)
    }

    fn translate(
        &self,
        app_id: &str,
        language_code: &str,
        full_config: &Value,
    ) -> Result<TranslationStatus, StoreError> {
        let url = self.endpoint(&["apps", app_id, "translate"])?;
        let request = TranslateRequest {
            language_code,
            config: full_config,
        };
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        Self::decode(response)
    }
}

/// Per-target dispatch flags for the fire-and-forget operations.
///
/// Regeneration is retriable once resolved; translation additionally
/// remembers completed languages so the same language is not queued twice
/// in one session. A failed translation clears its flag so the user can
/// retry.
#[derive(Debug, Default)]
pub struct PendingOperations {
    regenerating: HashSet<String>,
    translating: HashSet<String>,
    translated: HashSet<String>,
}

impl PendingOperations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a tab for regeneration. Returns false when that tab is
    /// already in flight, in which case the caller must not dispatch.
    pub fn try_begin_regenerate(&mut self, tab_key: &str) -> bool {
        self.regenerating.insert(tab_key.to_string())
    }

    pub fn finish_regenerate(&mut self, tab_key: &str) {
        self.regenerating.remove(tab_key);
    }

    pub fn is_regenerating(&self, tab_key: &str) -> bool {
        self.regenerating.contains(tab_key)
    }

    /// Claim a language for translation. Suppressed while in flight and
    /// after a successful completion.
    pub fn try_begin_translate(&mut self, language_code: &str) -> bool {
        if self.translated.contains(language_code) {
            return false;
        }
        self.translating.insert(language_code.to_string())
    }

    pub fn finish_translate(&mut self, language_code: &str, succeeded: bool) {
        self.translating.remove(language_code);
        if succeeded {
            self.translated.insert(language_code.to_string());
        }
    }

    pub fn is_translating(&self, language_code: &str) -> bool {
        self.translating.contains(language_code)
    }

    pub fn is_translated(&self, language_code: &str) -> bool {
        self.translated.contains(language_code)
    }

    /// Forget completed translations, e.g. after switching apps.
    pub fn reset_translations(&mut self) {
        self.translating.clear();
        self.translated.clear();
    }

    pub fn reset_regenerations(&mut self) {
        self.regenerating.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_regenerate_is_suppressed() {
        let mut pending = PendingOperations::new();
        assert!(pending.try_begin_regenerate("notifications"));
        assert!(!pending.try_begin_regenerate("notifications"));
        // A different tab may be in flight concurrently.
        assert!(pending.try_begin_regenerate("page1_referralPromote"));

        pending.finish_regenerate("notifications");
        assert!(pending.try_begin_regenerate("notifications"));
    }

    #[test]
    fn completed_translation_stays_suppressed() {
        let mut pending = PendingOperations::new();
        assert!(pending.try_begin_translate("de"));
        assert!(!pending.try_begin_translate("de"));

        pending.finish_translate("de", true);
        assert!(!pending.try_begin_translate("de"));
        assert!(pending.is_translated("de"));
    }

    #[test]
    fn failed_translation_can_be_retried() {
        let mut pending = PendingOperations::new();
        assert!(pending.try_begin_translate("fr"));
        pending.finish_translate("fr", false);
        assert!(pending.try_begin_translate("fr"));
    }
}

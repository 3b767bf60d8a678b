use egui::Color32;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub mod error_window;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NotificationType {
    Error,
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationError {
    pub message: String,
    pub code: Option<String>,
    pub details: Option<String>,
}

/// Operation a notification offers to re-run. Retry is offered for
/// transient failures (network reachability); validation and not-found
/// failures are dismiss-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryAction {
    ListApps,
    LoadConfig { app_id: String },
    SaveConfig { app_id: String },
    RegenerateTab { app_id: String, tab_key: String },
    Translate { app_id: String, language_code: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub notification_type: NotificationType,
    pub errors: Vec<NotificationError>,
    #[serde(skip, default = "Instant::now")]
    pub created_at: Instant,
    #[serde(skip, default)]
    pub expires_at: Option<Instant>,
    pub dismissible: bool,
    pub source: String, // e.g., "Config Store", "Generation Service"

    /// Re-runnable operation behind the failure, when there is one.
    pub retry: Option<RetryAction>,
}

impl Notification {
    pub fn new_error(
        id: String,
        title: String,
        errors: Vec<NotificationError>,
        source: String,
    ) -> Self {
        Self {
            id,
            title,
            notification_type: NotificationType::Error,
            errors,
            created_at: Instant::now(),
            expires_at: None, // Errors don't auto-expire
            dismissible: true,
            source,
            retry: None,
        }
    }

    pub fn new_warning(
        id: String,
        title: String,
        errors: Vec<NotificationError>,
        source: String,
    ) -> Self {
        Self {
            id,
            title,
            notification_type: NotificationType::Warning,
            errors,
            created_at: Instant::now(),
            expires_at: Some(Instant::now() + Duration::from_secs(30)),
            dismissible: true,
            source,
            retry: None,
        }
    }

    pub fn new_info(id: String, title: String, message: String, source: String) -> Self {
        Self {
            id,
            title,
            notification_type: NotificationType::Info,
            errors: vec![NotificationError {
                message,
                code: None,
                details: None,
            }],
            created_at: Instant::now(),
            expires_at: Some(Instant::now() + Duration::from_secs(10)),
            dismissible: true,
            source,
            retry: None,
        }
    }

    pub fn new_success(id: String, title: String, message: String, source: String) -> Self {
        Self {
            id,
            title,
            notification_type: NotificationType::Success,
            errors: vec![NotificationError {
                message,
                code: None,
                details: None,
            }],
            created_at: Instant::now(),
            expires_at: Some(Instant::now() + Duration::from_secs(5)),
            dismissible: true,
            source,
            retry: None,
        }
    }

    pub fn with_retry(mut self, retry: RetryAction) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            Instant::now() > expires_at
        } else {
            false
        }
    }

    pub fn get_color(&self) -> Color32 {
        match self.notification_type {
            NotificationType::Error => Color32::from_rgb(220, 50, 50),
            NotificationType::Warning => Color32::from_rgb(255, 150, 0),
            NotificationType::Info => Color32::from_rgb(70, 130, 200),
            NotificationType::Success => Color32::from_rgb(40, 180, 40),
        }
    }

    pub fn get_icon(&self) -> &'static str {
        match self.notification_type {
            NotificationType::Error => "✗",
            NotificationType::Warning => "⚠",
            NotificationType::Info => "ℹ",
            NotificationType::Success => "✓",
        }
    }
}

#[derive(Default)]
pub struct NotificationManager {
    notifications: HashMap<String, Notification>,
    pub show_details_window: bool,
    pub selected_notification_id: Option<String>,
    requested_retry: Option<RetryAction>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_notification(&mut self, notification: Notification) {
        self.notifications
            .insert(notification.id.clone(), notification);
    }

    pub fn dismiss_notification(&mut self, id: &str) {
        self.notifications.remove(id);
        if let Some(selected_id) = &self.selected_notification_id {
            if selected_id == id {
                self.selected_notification_id = None;
                self.show_details_window = false;
            }
        }
    }

    pub fn clear_expired(&mut self) {
        self.notifications
            .retain(|_, notification| !notification.is_expired());
    }

    pub fn get_active_notifications(&self) -> Vec<&Notification> {
        let mut notifications: Vec<&Notification> = self.notifications.values().collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications
    }

    pub fn get_notification(&self, id: &str) -> Option<&Notification> {
        self.notifications.get(id)
    }

    pub fn has_errors(&self) -> bool {
        self.notifications
            .values()
            .any(|n| matches!(n.notification_type, NotificationType::Error))
    }

    pub fn get_error_count(&self) -> usize {
        self.notifications
            .values()
            .filter(|n| matches!(n.notification_type, NotificationType::Error))
            .count()
    }

    pub fn get_warning_count(&self) -> usize {
        self.notifications
            .values()
            .filter(|n| matches!(n.notification_type, NotificationType::Warning))
            .count()
    }

    pub fn show_notification_details(&mut self, notification_id: String) {
        self.selected_notification_id = Some(notification_id);
        self.show_details_window = true;
    }

    /// Queue a retry click for the app loop to pick up on its next frame.
    pub fn request_retry(&mut self, action: RetryAction) {
        self.requested_retry = Some(action);
    }

    pub fn take_requested_retry(&mut self) -> Option<RetryAction> {
        self.requested_retry.take()
    }

    pub fn render_status_bar_indicator(&mut self, ui: &mut egui::Ui) {
        self.clear_expired();

        let error_count = self.get_error_count();
        let warning_count = self.get_warning_count();

        if error_count > 0 || warning_count > 0 {
            ui.separator();

            if error_count > 0 {
                let error_text = if error_count == 1 {
                    "1 error".to_string()
                } else {
                    format!("{} errors", error_count)
                };

                if ui
                    .colored_label(Color32::from_rgb(220, 50, 50), format!("✗ {}", error_text))
                    .clicked()
                {
                    // Find the first error notification and show it
                    if let Some(error_notification) = self
                        .get_active_notifications()
                        .iter()
                        .find(|n| matches!(n.notification_type, NotificationType::Error))
                    {
                        self.show_notification_details(error_notification.id.clone());
                    }
                }
            }

            if warning_count > 0 {
                let warning_text = if warning_count == 1 {
                    "1 warning".to_string()
                } else {
                    format!("{} warnings", warning_count)
                };

                if ui
                    .colored_label(
                        Color32::from_rgb(255, 150, 0),
                        format!("⚠ {}", warning_text),
                    )
                    .clicked()
                {
                    if let Some(warning_notification) = self
                        .get_active_notifications()
                        .iter()
                        .find(|n| matches!(n.notification_type, NotificationType::Warning))
                    {
                        self.show_notification_details(warning_notification.id.clone());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismiss_clears_selection() {
        let mut manager = NotificationManager::new();
        manager.add_notification(Notification::new_error(
            "n1".to_string(),
            "Save failed".to_string(),
            vec![],
            "Config Store".to_string(),
        ));
        manager.show_notification_details("n1".to_string());

        manager.dismiss_notification("n1");
        assert!(!manager.show_details_window);
        assert!(manager.selected_notification_id.is_none());
        assert!(manager.get_notification("n1").is_none());
    }

    #[test]
    fn retry_request_is_taken_once() {
        let mut manager = NotificationManager::new();
        manager.request_retry(RetryAction::SaveConfig {
            app_id: "a1".to_string(),
        });
        assert!(manager.take_requested_retry().is_some());
        assert!(manager.take_requested_retry().is_none());
    }

    #[test]
    fn error_counts() {
        let mut manager = NotificationManager::new();
        manager.add_notification(Notification::new_error(
            "e1".to_string(),
            "one".to_string(),
            vec![],
            "Config Store".to_string(),
        ));
        manager.add_notification(Notification::new_warning(
            "w1".to_string(),
            "two".to_string(),
            vec![],
            "Config Store".to_string(),
        ));
        assert!(manager.has_errors());
        assert_eq!(manager.get_error_count(), 1);
        assert_eq!(manager.get_warning_count(), 1);
    }
}

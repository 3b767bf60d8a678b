//! Window Focus Management System
//!
//! Trait-based focus handling for the console's floating windows. Windows
//! implement [`FocusableWindow`] so the window menu can bring any of them
//! to the foreground through one code path instead of per-window hacks.

use eframe::egui;

/// Trait for windows that can be brought to the foreground.
pub trait FocusableWindow {
    /// Parameters required for the show method.
    ///
    /// Simple windows take `()`; windows that render themed content take
    /// [`ThemeShowParams`].
    type ShowParams;

    /// Unique identifier for this window type.
    fn window_id(&self) -> &'static str;

    /// Human-readable title, matching the title bar text.
    fn window_title(&self) -> String;

    /// Whether this window is currently open.
    fn is_open(&self) -> bool;

    /// Render the window. When `bring_to_front` is true the window is
    /// displayed with `egui::Order::Foreground`.
    fn show_with_focus(
        &mut self,
        ctx: &egui::Context,
        params: Self::ShowParams,
        bring_to_front: bool,
    );
}

/// Tracks which window should be raised on the next frame.
pub struct WindowFocusManager {
    bring_to_front_window: Option<String>,
}

impl WindowFocusManager {
    pub fn new() -> Self {
        Self {
            bring_to_front_window: None,
        }
    }

    pub fn request_focus(&mut self, window_id: String) {
        self.bring_to_front_window = Some(window_id);
    }

    pub fn should_bring_to_front(&self, window_id: &str) -> bool {
        self.bring_to_front_window.as_deref() == Some(window_id)
    }

    /// Must be called by the window that consumed the request, or it stays
    /// in foreground order indefinitely.
    pub fn clear_bring_to_front(&mut self, window_id: &str) {
        if self.should_bring_to_front(window_id) {
            self.bring_to_front_window = None;
        }
    }

    pub fn apply_focus_order(window: egui::Window<'_>, bring_to_front: bool) -> egui::Window<'_> {
        if bring_to_front {
            window.order(egui::Order::Foreground)
        } else {
            window
        }
    }
}

impl Default for WindowFocusManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters for windows that need no additional data.
pub type SimpleShowParams = ();

/// Parameters for windows that render themed content.
#[derive(Clone)]
pub struct ThemeShowParams {
    pub theme: String,
}

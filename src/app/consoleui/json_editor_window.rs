use crate::app::consoleui::app::ThemeChoice;
use crate::app::consoleui::window_focus::{FocusableWindow, ThemeShowParams};
use crate::app::json_syntax;
use eframe::egui::{self, Color32, RichText, ScrollArea, Window};
use egui_code_editor::{CodeEditor, ColorTheme};
use serde_json::Value;
use tracing::info;

/// Window for editing one tab's subtree as raw JSON.
///
/// Invalid JSON is rejected at this boundary: the offending text stays on
/// screen with an inline diagnostic and nothing reaches the working tree
/// until the content parses.
pub struct JsonEditorWindow {
    /// Whether the window is open
    pub show: bool,

    /// Key of the tab whose subtree is being edited
    pub tab_key: String,

    /// Title of that tab, for the window title bar
    pub tab_title: String,

    /// JSON content for editing
    pub json_content: String,

    /// Error message if JSON is invalid
    pub error_message: Option<String>,

    /// Flag indicating that a save was requested
    pub save_requested: bool,

    /// The parsed subtree after a successful save
    pub saved_subtree: Option<Value>,
}

#[allow(clippy::derivable_impls)]
impl Default for JsonEditorWindow {
    fn default() -> Self {
        Self {
            show: false,
            tab_key: String::new(),
            tab_title: String::new(),
            json_content: String::new(),
            error_message: None,
            save_requested: false,
            saved_subtree: None,
        }
    }
}

impl JsonEditorWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the editor for one tab's subtree.
    pub fn open_for_tab(&mut self, tab_key: &str, tab_title: &str, subtree: &Value) {
        self.tab_key = tab_key.to_string();
        self.tab_title = tab_title.to_string();
        self.error_message = None;
        self.save_requested = false;
        self.saved_subtree = None;

        match serde_json::to_string_pretty(subtree) {
            Ok(json) => self.json_content = json,
            Err(e) => {
                self.error_message = Some(format!("Failed to serialize subtree: {}", e));
                self.json_content = String::new();
            }
        }

        self.show = true;
    }

    /// Take the subtree saved on the last frame, if any.
    pub fn take_saved(&mut self) -> Option<(String, Value)> {
        if self.save_requested {
            self.save_requested = false;
            self.saved_subtree
                .take()
                .map(|subtree| (self.tab_key.clone(), subtree))
        } else {
            None
        }
    }

    /// Show the editor window
    pub fn show(&mut self, ctx: &egui::Context, global_theme: ThemeChoice, bring_to_front: bool) {
        if !self.show {
            return;
        }

        let mut save_clicked = false;
        let mut close_window = false;

        let screen_rect = ctx.screen_rect();
        let editor_height = screen_rect.height() * 0.8;
        let editor_width = screen_rect.width() * 0.6;

        let window = Window::new(format!("JSON Editor: {}", self.tab_title))
            .open(&mut self.show)
            .min_width(600.0)
            .min_height(400.0)
            .default_width(editor_width.min(800.0))
            .default_height(editor_height.min(800.0))
            .max_height(screen_rect.height() * 0.9)
            .resizable(true);

        crate::app::consoleui::window_focus::WindowFocusManager::apply_focus_order(
            window,
            bring_to_front,
        )
        .show(ctx, |ui| {
                ui.set_max_height(editor_height);
                // Error display
                if let Some(error) = &self.error_message {
                    ui.colored_label(Color32::from_rgb(220, 50, 50), error);
                    ui.separator();
                }

                // Reserve space for the button row below the editor.
                let available_height = ui.available_height() - 80.0;

                ui.set_min_height(available_height);
                ui.set_max_height(available_height);

                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .max_height(available_height)
                    .id_salt("json_editor_scroll")
                    .show(ui, |ui| {
                        let rows = (available_height / 20.0).max(10.0) as usize;

                        let code_theme = if global_theme == ThemeChoice::Latte {
                            ColorTheme::GITHUB_LIGHT
                        } else {
                            ColorTheme::GITHUB_DARK
                        };

                        CodeEditor::default()
                            .id_source("config_json_editor")
                            .with_rows(rows)
                            .with_fontsize(14.0)
                            .with_theme(code_theme)
                            .with_syntax(json_syntax::config_json_syntax())
                            .show(ui, &mut self.json_content);
                    });

                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button(RichText::new("Save").size(16.0)).clicked() {
                        save_clicked = true;
                    }

                    if ui.button(RichText::new("Cancel").size(16.0)).clicked() {
                        close_window = true;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Validate JSON").clicked() {
                            match serde_json::from_str::<Value>(&self.json_content) {
                                Ok(_) => {
                                    self.error_message = Some("JSON is valid!".to_string());
                                }
                                Err(e) => {
                                    self.error_message = Some(format!("Invalid JSON: {}", e));
                                }
                            }
                        }
                    });
                });
            });

        // Handle save action
        if save_clicked {
            match serde_json::from_str::<Value>(&self.json_content) {
                Ok(subtree) => {
                    info!("saving JSON subtree for tab: {}", self.tab_key);

                    self.saved_subtree = Some(subtree);
                    self.save_requested = true;

                    self.show = false;
                    self.error_message = None;
                }
                Err(e) => {
                    // Keep the bad text on screen with the diagnostic.
                    self.error_message = Some(format!("Invalid JSON: {}", e));
                }
            }
        }

        if close_window {
            self.show = false;
        }
    }
}

impl FocusableWindow for JsonEditorWindow {
    type ShowParams = ThemeShowParams;

    fn window_id(&self) -> &'static str {
        "json_editor"
    }

    fn window_title(&self) -> String {
        "JSON Editor".to_string()
    }

    fn is_open(&self) -> bool {
        self.show
    }

    fn show_with_focus(
        &mut self,
        ctx: &egui::Context,
        params: Self::ShowParams,
        bring_to_front: bool,
    ) {
        let theme = match params.theme.as_str() {
            "Latte" => ThemeChoice::Latte,
            "Frappe" => ThemeChoice::Frappe,
            "Macchiato" => ThemeChoice::Macchiato,
            "Mocha" => ThemeChoice::Mocha,
            _ => ThemeChoice::default(),
        };
        self.show(ctx, theme, bring_to_front);
    }
}

use crate::app::apps::{App, AppFieldsUpdate, NewApp};
use crate::app::consoleui::window_focus::{FocusableWindow, SimpleShowParams};
use eframe::egui::{self, Color32, Context, Grid, RichText, Window};

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum AppFormMode {
    #[default]
    Closed,
    NewApp,
    EditApp,
}

/// Editable copy of the App fields shown in the form.
#[derive(Debug, Clone, Default)]
pub struct AppForm {
    pub app_name: String,
    pub package_name: String,
    pub description: String,
    pub play_url: String,
    pub app_store_url: String,
}

impl AppForm {
    pub fn from_app(app: &App) -> Self {
        Self {
            app_name: app.app_name.clone(),
            package_name: app.package_name.clone(),
            description: app.meta.description.clone(),
            play_url: app.meta.play_url.clone(),
            app_store_url: app.meta.app_store_url.clone(),
        }
    }

    pub fn to_new_app(&self) -> NewApp {
        NewApp {
            app_name: self.app_name.trim().to_string(),
            package_name: self.package_name.trim().to_string(),
            app_description: self.description.trim().to_string(),
        }
    }

    /// Partial update containing only the fields that differ from the
    /// record being edited.
    pub fn to_update(&self, app: &App) -> AppFieldsUpdate {
        let mut update = AppFieldsUpdate::default();
        if self.app_name != app.app_name {
            update.app_name = Some(self.app_name.clone());
        }
        if self.package_name != app.package_name {
            update.package_name = Some(self.package_name.clone());
        }
        if self.description != app.meta.description {
            update.description = Some(self.description.clone());
        }
        if self.play_url != app.meta.play_url {
            update.play_url = Some(self.play_url.clone());
        }
        if self.app_store_url != app.meta.app_store_url {
            update.app_store_url = Some(self.app_store_url.clone());
        }
        update
    }
}

/// Outcome of a submitted form, handed back to the app loop to dispatch
/// against the store.
#[derive(Debug, Clone)]
pub enum AppFormResult {
    Create(NewApp),
    Update {
        app_id: String,
        fields: AppFieldsUpdate,
    },
}

#[derive(Default)]
pub struct AppFormWindow {
    pub mode: AppFormMode,
    pub form: AppForm,
    editing_app: Option<App>,
    pub error_message: Option<String>,
}

impl AppFormWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_new(&mut self) {
        self.mode = AppFormMode::NewApp;
        self.form = AppForm::default();
        self.editing_app = None;
        self.error_message = None;
    }

    pub fn open_edit(&mut self, app: &App) {
        self.mode = AppFormMode::EditApp;
        self.form = AppForm::from_app(app);
        self.editing_app = Some(app.clone());
        self.error_message = None;
    }

    pub fn is_open(&self) -> bool {
        self.mode != AppFormMode::Closed
    }

    /// Render the form. Returns the submitted result once it validates.
    pub fn show(&mut self, ctx: &Context, bring_to_front: bool) -> Option<AppFormResult> {
        if self.mode == AppFormMode::Closed {
            return None;
        }

        let title = match self.mode {
            AppFormMode::NewApp => "New App",
            AppFormMode::EditApp => "Edit App",
            AppFormMode::Closed => return None,
        };

        let mut result = None;
        let mut submit_clicked = false;
        let mut cancel_clicked = false;
        let mut open = true;

        let window = Window::new(title)
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .min_width(420.0);

        crate::app::consoleui::window_focus::WindowFocusManager::apply_focus_order(
            window,
            bring_to_front,
        )
        .show(ctx, |ui| {
                if let Some(error) = &self.error_message {
                    ui.colored_label(Color32::from_rgb(220, 50, 50), error);
                    ui.separator();
                }

                Grid::new("app_form_grid")
                    .num_columns(2)
                    .spacing([10.0, 8.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("App Name *").strong());
                        ui.text_edit_singleline(&mut self.form.app_name);
                        ui.end_row();

                        ui.label(RichText::new("Package Name *").strong());
                        ui.text_edit_singleline(&mut self.form.package_name);
                        ui.end_row();

                        ui.label("Description");
                        ui.text_edit_multiline(&mut self.form.description);
                        ui.end_row();

                        ui.label("Play URL");
                        ui.text_edit_singleline(&mut self.form.play_url);
                        ui.end_row();

                        ui.label("App Store URL");
                        ui.text_edit_singleline(&mut self.form.app_store_url);
                        ui.end_row();
                    });

                ui.separator();

                ui.horizontal(|ui| {
                    let submit_label = match self.mode {
                        AppFormMode::NewApp => "Create",
                        _ => "Save",
                    };
                    if ui.button(RichText::new(submit_label).size(16.0)).clicked() {
                        submit_clicked = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel_clicked = true;
                    }
                });
            });

        if submit_clicked {
            match self.mode {
                AppFormMode::NewApp => {
                    let fields = self.form.to_new_app();
                    match fields.validate() {
                        Ok(()) => {
                            result = Some(AppFormResult::Create(fields));
                            self.close();
                        }
                        Err(message) => self.error_message = Some(message),
                    }
                }
                AppFormMode::EditApp => {
                    if let Some(app) = &self.editing_app {
                        if self.form.app_name.trim().is_empty() {
                            self.error_message = Some("App name is required".to_string());
                        } else if self.form.package_name.trim().is_empty() {
                            self.error_message = Some("Package name is required".to_string());
                        } else {
                            let fields = self.form.to_update(app);
                            if !fields.is_empty() {
                                result = Some(AppFormResult::Update {
                                    app_id: app.app_id.clone(),
                                    fields,
                                });
                            }
                            self.close();
                        }
                    }
                }
                AppFormMode::Closed => {}
            }
        }

        if cancel_clicked || !open {
            self.close();
        }

        result
    }

    fn close(&mut self) {
        self.mode = AppFormMode::Closed;
        self.editing_app = None;
        self.error_message = None;
    }
}

impl FocusableWindow for AppFormWindow {
    type ShowParams = SimpleShowParams;

    fn window_id(&self) -> &'static str {
        "app_form"
    }

    fn window_title(&self) -> String {
        match self.mode {
            AppFormMode::EditApp => "Edit App".to_string(),
            _ => "New App".to_string(),
        }
    }

    fn is_open(&self) -> bool {
        AppFormWindow::is_open(self)
    }

    fn show_with_focus(
        &mut self,
        ctx: &egui::Context,
        _params: Self::ShowParams,
        bring_to_front: bool,
    ) {
        let _ = self.show(ctx, bring_to_front);
    }
}

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use serde_json::Value;
use tracing::{error, info, warn};

use super::app_form_window::{AppFormResult, AppFormWindow};
use super::json_editor_window::JsonEditorWindow;
use super::menu;
use super::tree_editor::TreeEditor;
use super::window_focus::{FocusableWindow, WindowFocusManager};
use crate::app::apps::App;
use crate::app::config_cache::ConfigCache;
use crate::app::config_store::{ConfigStore, HttpConfigStore, MemoryConfigStore, SaveReceipt, StoreError};
use crate::app::config_tree::EditPath;
use crate::app::generation::{
    GenerationService, HttpGenerationService, PendingOperations, TabRegeneration,
    TranslationStatus,
};
use crate::app::identity::{IdentityProvider, SessionIdentity, User};
use crate::app::notifications::error_window::NotificationDetailsWindow;
use crate::app::notifications::{Notification, NotificationError, NotificationManager, RetryAction};
use crate::app::reconciler::{ConfigReconciler, SwitchRequest, SyncState};
use crate::app::settings::Settings;
use crate::app::tab_projection::{self, Tab};

#[derive(serde::Deserialize, serde::Serialize, Clone, Copy, PartialEq, Default)]
pub enum ThemeChoice {
    #[default]
    Latte,
    Frappe,
    Macchiato,
    Mocha,
}

impl std::fmt::Display for ThemeChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeChoice::Latte => write!(f, "Latte"),
            ThemeChoice::Frappe => write!(f, "Frappe"),
            ThemeChoice::Macchiato => write!(f, "Macchiato"),
            ThemeChoice::Mocha => write!(f, "Mocha"),
        }
    }
}

/// Results delivered from worker threads back to the UI loop. Workers do
/// the blocking store and generation calls; the UI thread only ever polls
/// this channel.
pub enum WorkerEvent {
    AppsListed(Result<Vec<App>, StoreError>),
    AppCreated(Result<App, StoreError>),
    AppUpdated(Result<App, StoreError>),
    AppDeleted {
        app_id: String,
        result: Result<(), StoreError>,
    },
    ConfigLoaded {
        app_id: String,
        result: Result<Value, StoreError>,
    },
    ConfigSaved {
        app_id: String,
        tree: Value,
        updated_app: Option<App>,
        result: Result<SaveReceipt, StoreError>,
    },
    TabRegenerated {
        tab_key: String,
        tree_key: String,
        result: Result<TabRegeneration, StoreError>,
    },
    Translated {
        language_code: String,
        result: Result<TranslationStatus, StoreError>,
    },
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct ConsoleApp {
    #[serde(default)]
    pub theme: ThemeChoice,

    #[serde(skip)]
    settings: Settings,
    #[serde(skip)]
    services: Services,
    #[serde(skip)]
    cache: ConfigCache,
    #[serde(skip)]
    reconciler: ConfigReconciler,
    #[serde(skip)]
    tree_editor: TreeEditor,
    #[serde(skip)]
    pending_ops: PendingOperations,
    #[serde(skip)]
    pub notification_manager: NotificationManager,
    #[serde(skip)]
    window_focus_manager: WindowFocusManager,
    #[serde(skip)]
    pub json_editor_window: JsonEditorWindow,
    #[serde(skip)]
    pub app_form_window: AppFormWindow,
    #[serde(skip)]
    apps: Vec<App>,
    #[serde(skip)]
    selected_tab: Option<Tab>,
    #[serde(skip)]
    loading_config_for: Option<String>,
    #[serde(skip)]
    confirm_delete: Option<String>,
    #[serde(skip)]
    workers: WorkerChannel,
    #[serde(skip)]
    apps_requested: bool,
    #[serde(skip)]
    theme_applied: bool,
}

/// Channel carrying worker results back to the UI thread.
struct WorkerChannel {
    tx: mpsc::Sender<WorkerEvent>,
    rx: mpsc::Receiver<WorkerEvent>,
}

impl Default for WorkerChannel {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

/// Collaborator handles, rebuilt from settings at startup.
struct Services {
    store: Arc<dyn ConfigStore>,
    generation: Option<Arc<dyn GenerationService>>,
    identity: Arc<SessionIdentity>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            store: Arc::new(MemoryConfigStore::new()),
            generation: None,
            identity: Arc::new(SessionIdentity::new()),
        }
    }
}

impl Default for ConsoleApp {
    fn default() -> Self {
        Self {
            theme: ThemeChoice::default(),
            settings: Settings::default(),
            services: Services::default(),
            cache: ConfigCache::new(),
            reconciler: ConfigReconciler::new(),
            tree_editor: TreeEditor::new(),
            pending_ops: PendingOperations::new(),
            notification_manager: NotificationManager::new(),
            window_focus_manager: WindowFocusManager::new(),
            json_editor_window: JsonEditorWindow::new(),
            app_form_window: AppFormWindow::new(),
            apps: Vec::new(),
            selected_tab: None,
            loading_config_for: None,
            confirm_delete: None,
            workers: WorkerChannel::default(),
            apps_requested: false,
            theme_applied: false,
        }
    }
}

impl ConsoleApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: ConsoleApp = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Self::default()
        };

        app.settings = Settings::load();
        app.services.store = match app.settings.store_url.as_deref() {
            Some(url) => match HttpConfigStore::new(url) {
                Ok(store) => {
                    info!("using config store at {}", url);
                    Arc::new(store)
                }
                Err(e) => {
                    error!("invalid store URL {}: {}; using in-memory store", url, e);
                    Arc::new(MemoryConfigStore::new())
                }
            },
            None => {
                warn!("no store URL configured; using in-memory store");
                Arc::new(MemoryConfigStore::new())
            }
        };
        app.services.generation = match app.settings.generation_url.as_deref() {
            Some(url) => match HttpGenerationService::new(url) {
                Ok(service) => Some(Arc::new(service) as Arc<dyn GenerationService>),
                Err(e) => {
                    error!("invalid generation URL {}: {}", url, e);
                    None
                }
            },
            None => None,
        };

        // The identity provider hands the session over via environment;
        // without one the console falls back to a local operator session.
        let email = std::env::var("REFCONSOLE_USER")
            .unwrap_or_else(|_| "operator@localhost".to_string());
        let display_name = email.split('@').next().unwrap_or("operator").to_string();
        app.services.identity = Arc::new(SessionIdentity::signed_in(User {
            email,
            display_name,
        }));

        app.apply_theme(&cc.egui_ctx);
        app
    }

    pub fn apply_theme(&self, ctx: &egui::Context) {
        match self.theme {
            ThemeChoice::Latte => catppuccin_egui::set_theme(ctx, catppuccin_egui::LATTE),
            ThemeChoice::Frappe => catppuccin_egui::set_theme(ctx, catppuccin_egui::FRAPPE),
            ThemeChoice::Macchiato => catppuccin_egui::set_theme(ctx, catppuccin_egui::MACCHIATO),
            ThemeChoice::Mocha => catppuccin_egui::set_theme(ctx, catppuccin_egui::MOCHA),
        }
    }

    fn spawn_worker<F>(&self, ctx: &egui::Context, job: F)
    where
        F: FnOnce() -> WorkerEvent + Send + 'static,
    {
        let tx = self.workers.tx.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let event = job();
            if tx.send(event).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    fn selected_app(&self) -> Option<&App> {
        let selected_id = self
            .reconciler
            .app_id()
            .or(self.loading_config_for.as_deref())?;
        self.apps.iter().find(|a| a.app_id == selected_id)
    }

    fn notify_store_error(&mut self, title: &str, err: &StoreError, retry: Option<RetryAction>) {
        let mut notification = Notification::new_error(
            uuid::Uuid::new_v4().to_string(),
            title.to_string(),
            vec![NotificationError {
                message: err.to_string(),
                code: None,
                details: None,
            }],
            "Config Store".to_string(),
        );
        if err.is_retryable() {
            if let Some(retry) = retry {
                notification = notification.with_retry(retry);
            }
        }
        self.notification_manager.add_notification(notification);
    }

    // ------------------------------------------------------------------
    // Store dispatch
    // ------------------------------------------------------------------

    fn dispatch_list_apps(&mut self, ctx: &egui::Context) {
        let store = self.services.store.clone();
        self.spawn_worker(ctx, move || WorkerEvent::AppsListed(store.list_apps()));
    }

    fn dispatch_load_config(&mut self, ctx: &egui::Context, app_id: &str) {
        if let Some(tree) = self.cache.get(app_id) {
            info!("config for {} served from cache", app_id);
            self.finish_load(app_id.to_string(), tree);
            return;
        }
        self.loading_config_for = Some(app_id.to_string());
        let store = self.services.store.clone();
        let app_id = app_id.to_string();
        self.spawn_worker(ctx, move || WorkerEvent::ConfigLoaded {
            result: store.get_config(&app_id),
            app_id,
        });
    }

    fn finish_load(&mut self, app_id: String, tree: Value) {
        self.loading_config_for = None;
        self.reconciler.load(&app_id, tree);
        self.tree_editor.reset();
        self.pending_ops.reset_regenerations();
        self.pending_ops.reset_translations();
        self.selected_tab = tab_projection::project_tabs(self.reconciler.current())
            .into_iter()
            .next();
    }

    fn dispatch_save(&mut self, ctx: &egui::Context) {
        // Flush the debounce buffer first so the last keystroke rides
        // this save rather than the next one.
        let edits = self.tree_editor.flush();
        for edit in edits {
            self.reconciler.apply_edit(&edit.path, edit.value);
        }
        let Some(payload) = self.reconciler.begin_save() else {
            return;
        };
        let store = self.services.store.clone();
        self.spawn_worker(ctx, move || {
            let mut updated_app = None;
            if let Some(details) = &payload.details {
                match store.update_app(&payload.app_id, details) {
                    Ok(app) => updated_app = Some(app),
                    Err(err) => {
                        return WorkerEvent::ConfigSaved {
                            app_id: payload.app_id,
                            tree: payload.tree,
                            updated_app: None,
                            result: Err(err),
                        };
                    }
                }
            }
            let result = store.save_config(&payload.app_id, &payload.tree);
            WorkerEvent::ConfigSaved {
                app_id: payload.app_id,
                tree: payload.tree,
                updated_app,
                result,
            }
        });
    }

    fn dispatch_regenerate(&mut self, ctx: &egui::Context, tab: &Tab) {
        let Some(generation) = self.services.generation.clone() else {
            self.notification_manager.add_notification(Notification::new_warning(
                uuid::Uuid::new_v4().to_string(),
                "Generation service not configured".to_string(),
                vec![NotificationError {
                    message: "Set generation_url in settings.toml to enable tab regeneration"
                        .to_string(),
                    code: None,
                    details: None,
                }],
                "Generation Service".to_string(),
            ));
            return;
        };
        let Some(app_id) = self.reconciler.app_id().map(String::from) else {
            return;
        };
        let Some(tree_key) = tab.tree_key().map(String::from) else {
            return;
        };
        let tab_key = tab.key().to_string();
        if !self.pending_ops.try_begin_regenerate(&tab_key) {
            return;
        }

        let subtree = tab_projection::tab_subtree(self.reconciler.current(), tab);
        let (app_name, app_description) = match self.selected_app() {
            Some(app) => (
                Some(app.app_name.clone()),
                Some(app.meta.description.clone()),
            ),
            None => (None, None),
        };
        self.spawn_worker(ctx, move || WorkerEvent::TabRegenerated {
            result: generation.regenerate_tab(
                &app_id,
                &tab_key,
                &subtree,
                app_name.as_deref(),
                app_description.as_deref(),
            ),
            tab_key,
            tree_key,
        });
    }

    fn dispatch_translate(&mut self, ctx: &egui::Context, language_code: &str) {
        let Some(generation) = self.services.generation.clone() else {
            return;
        };
        let Some(app_id) = self.reconciler.app_id().map(String::from) else {
            return;
        };
        if !self.pending_ops.try_begin_translate(language_code) {
            return;
        }
        let full_config = self.reconciler.current().clone();
        let language_code = language_code.to_string();
        self.spawn_worker(ctx, move || WorkerEvent::Translated {
            result: generation.translate(&app_id, &language_code, &full_config),
            language_code,
        });
    }

    fn handle_retry(&mut self, ctx: &egui::Context, action: RetryAction) {
        match action {
            RetryAction::ListApps => self.dispatch_list_apps(ctx),
            RetryAction::LoadConfig { app_id } => self.dispatch_load_config(ctx, &app_id),
            RetryAction::SaveConfig { .. } => self.dispatch_save(ctx),
            RetryAction::RegenerateTab { tab_key, .. } => {
                let tabs = tab_projection::project_tabs(self.reconciler.current());
                if let Some(tab) = tabs.into_iter().find(|t| t.key() == tab_key) {
                    self.dispatch_regenerate(ctx, &tab);
                }
            }
            RetryAction::Translate { language_code, .. } => {
                self.dispatch_translate(ctx, &language_code)
            }
        }
    }

    // ------------------------------------------------------------------
    // Worker event handling
    // ------------------------------------------------------------------

    fn handle_worker_events(&mut self) {
        while let Ok(event) = self.workers.rx.try_recv() {
            match event {
                WorkerEvent::AppsListed(Ok(apps)) => {
                    info!("loaded {} apps", apps.len());
                    self.apps = apps;
                }
                WorkerEvent::AppsListed(Err(err)) => {
                    self.notify_store_error(
                        "Failed to load apps",
                        &err,
                        Some(RetryAction::ListApps),
                    );
                }
                WorkerEvent::AppCreated(Ok(app)) => {
                    self.notification_manager.add_notification(Notification::new_success(
                        uuid::Uuid::new_v4().to_string(),
                        "App created".to_string(),
                        format!("{} ({})", app.app_name, app.app_id),
                        "Config Store".to_string(),
                    ));
                    self.apps.push(app);
                }
                WorkerEvent::AppCreated(Err(err)) => {
                    self.notify_store_error("Failed to create app", &err, None);
                }
                WorkerEvent::AppUpdated(Ok(app)) => {
                    if let Some(existing) =
                        self.apps.iter_mut().find(|a| a.app_id == app.app_id)
                    {
                        *existing = app;
                    }
                }
                WorkerEvent::AppUpdated(Err(err)) => {
                    self.notify_store_error("Failed to update app", &err, None);
                }
                WorkerEvent::AppDeleted { app_id, result } => match result {
                    Ok(()) => {
                        self.apps.retain(|a| a.app_id != app_id);
                        self.cache.invalidate(&app_id);
                        if self.reconciler.app_id() == Some(app_id.as_str()) {
                            self.reconciler.unload();
                            self.tree_editor.reset();
                            self.selected_tab = None;
                        }
                    }
                    Err(err) => {
                        self.notify_store_error("Failed to delete app", &err, None);
                    }
                },
                WorkerEvent::ConfigLoaded { app_id, result } => match result {
                    Ok(tree) => {
                        self.cache.insert(&app_id, tree.clone());
                        self.finish_load(app_id, tree);
                    }
                    Err(err) => {
                        self.loading_config_for = None;
                        self.notify_store_error(
                            "Failed to load config",
                            &err,
                            Some(RetryAction::LoadConfig { app_id }),
                        );
                    }
                },
                WorkerEvent::ConfigSaved {
                    app_id,
                    tree,
                    updated_app,
                    result,
                } => {
                    if let Some(app) = updated_app {
                        if let Some(existing) =
                            self.apps.iter_mut().find(|a| a.app_id == app.app_id)
                        {
                            *existing = app;
                        }
                    }
                    match result {
                        Ok(receipt) => {
                            self.reconciler.complete_save(&tree, Ok(()));
                            // The store copy changed; drop the stale cache entry.
                            self.cache.invalidate(&app_id);
                            self.notification_manager.add_notification(
                                Notification::new_success(
                                    uuid::Uuid::new_v4().to_string(),
                                    "Config saved".to_string(),
                                    format!("Revised at {}", receipt.revised_at),
                                    "Config Store".to_string(),
                                ),
                            );
                        }
                        Err(err) => {
                            self.reconciler.complete_save(&tree, Err(err.clone()));
                            self.notify_store_error(
                                "Failed to save config",
                                &err,
                                Some(RetryAction::SaveConfig { app_id }),
                            );
                        }
                    }
                }
                WorkerEvent::TabRegenerated {
                    tab_key,
                    tree_key,
                    result,
                } => {
                    self.pending_ops.finish_regenerate(&tab_key);
                    match result {
                        Ok(TabRegeneration { new_subtree, .. }) => {
                            self.reconciler
                                .replace_subtree(&EditPath::parse(&tree_key), new_subtree);
                            self.tree_editor.reset();
                        }
                        Err(err) => {
                            let app_id =
                                self.reconciler.app_id().unwrap_or_default().to_string();
                            self.notify_store_error(
                                "Failed to regenerate tab",
                                &err,
                                Some(RetryAction::RegenerateTab { app_id, tab_key }),
                            );
                        }
                    }
                }
                WorkerEvent::Translated {
                    language_code,
                    result,
                } => match result {
                    Ok(TranslationStatus { status, .. }) => {
                        self.pending_ops.finish_translate(&language_code, true);
                        self.notification_manager.add_notification(Notification::new_info(
                            uuid::Uuid::new_v4().to_string(),
                            format!("Translation queued: {}", language_code),
                            status,
                            "Generation Service".to_string(),
                        ));
                    }
                    Err(err) => {
                        self.pending_ops.finish_translate(&language_code, false);
                        let app_id = self.reconciler.app_id().unwrap_or_default().to_string();
                        self.notify_store_error(
                            "Failed to queue translation",
                            &err,
                            Some(RetryAction::Translate {
                                app_id,
                                language_code,
                            }),
                        );
                    }
                },
            }
        }
    }

    // ------------------------------------------------------------------
    // UI panels
    // ------------------------------------------------------------------

    fn render_top_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_menu").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                let user = self.services.identity.current_user();
                let store_label = if self.settings.store_url.is_some() {
                    "remote store"
                } else {
                    "local store"
                };
                let selected = self.selected_app().cloned();
                let action = menu::build_menu(
                    ui,
                    ctx,
                    &mut self.theme,
                    selected.as_ref(),
                    user.as_ref(),
                    store_label,
                );
                match action {
                    menu::MenuAction::ThemeChanged => self.apply_theme(ctx),
                    menu::MenuAction::NewApp => {
                        self.app_form_window.open_new();
                        self.window_focus_manager
                            .request_focus(self.app_form_window.window_id().to_string());
                    }
                    menu::MenuAction::EditApp => {
                        if let Some(app) = selected {
                            self.app_form_window.open_edit(&app);
                            self.window_focus_manager
                                .request_focus(self.app_form_window.window_id().to_string());
                        }
                    }
                    menu::MenuAction::DeleteApp => {
                        if let Some(app) = selected {
                            self.confirm_delete = Some(app.app_id);
                        }
                    }
                    menu::MenuAction::RefreshApps => {
                        self.cache.invalidate_all();
                        self.dispatch_list_apps(ctx);
                    }
                    menu::MenuAction::Logout => self.services.identity.logout(),
                    menu::MenuAction::Quit => {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                    menu::MenuAction::None => {}
                }
            });
        });
    }

    fn render_app_list(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("app_list")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Apps");
                ui.separator();
                let selected_id = self
                    .reconciler
                    .app_id()
                    .or(self.loading_config_for.as_deref())
                    .map(String::from);
                let mut clicked_app: Option<String> = None;
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for app in &self.apps {
                        let is_selected = selected_id.as_deref() == Some(app.app_id.as_str());
                        let label = ui.selectable_label(is_selected, &app.app_name);
                        if label.clicked() && !is_selected {
                            clicked_app = Some(app.app_id.clone());
                        }
                        label.on_hover_text(&app.package_name);
                    }
                    if self.apps.is_empty() {
                        ui.weak("No apps yet");
                    }
                });
                ui.separator();
                if ui.button("＋ New App").clicked() {
                    self.app_form_window.open_new();
                }

                if let Some(target) = clicked_app {
                    match self.reconciler.request_switch(&target) {
                        SwitchRequest::Granted => self.dispatch_load_config(ctx, &target),
                        SwitchRequest::NeedsConfirmation => {
                            info!("switch to {} gated on unsaved changes", target);
                        }
                    }
                }
            });
    }

    fn render_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.reconciler.app_id().is_none() {
                if self.loading_config_for.is_some() {
                    ui.centered_and_justified(|ui| {
                        ui.spinner();
                    });
                } else {
                    ui.centered_and_justified(|ui| {
                        ui.weak("Select an app to edit its campaign config");
                    });
                }
                return;
            }

            let tabs = tab_projection::project_tabs(self.reconciler.current());
            if self
                .selected_tab
                .as_ref()
                .map(|tab| !tabs.contains(tab))
                .unwrap_or(true)
            {
                self.selected_tab = tabs.first().cloned();
            }

            ui.horizontal_wrapped(|ui| {
                for tab in &tabs {
                    let is_selected = self.selected_tab.as_ref() == Some(tab);
                    let mut title = tab_projection::tab_title(tab);
                    if self.pending_ops.is_regenerating(tab.key()) {
                        title = format!("⟳ {}", title);
                    }
                    if ui.selectable_label(is_selected, title).clicked() {
                        self.selected_tab = Some(tab.clone());
                    }
                }
            });
            ui.separator();

            let Some(tab) = self.selected_tab.clone() else {
                return;
            };

            match &tab {
                Tab::AppDetails => self.render_app_details_tab(ui),
                _ => self.render_tree_tab(ctx, ui, &tab),
            }
        });
    }

    fn render_tree_tab(&mut self, ctx: &egui::Context, ui: &mut egui::Ui, tab: &Tab) {
        // Read-only projection for viewers without a session; editing
        // requires a signed-in user.
        let locked = self.services.identity.current_user().is_none()
            || self.pending_ops.is_regenerating(tab.key());

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!locked, egui::Button::new("Raw JSON"))
                .clicked()
            {
                let subtree = tab_projection::tab_subtree(self.reconciler.current(), tab);
                if let Some(tree_key) = tab.tree_key() {
                    self.json_editor_window.open_for_tab(
                        tree_key,
                        &tab_projection::tab_title(tab),
                        &subtree,
                    );
                    self.window_focus_manager
                        .request_focus(self.json_editor_window.window_id().to_string());
                }
            }
            let regenerating = self.pending_ops.is_regenerating(tab.key());
            if ui
                .add_enabled(
                    !locked && !regenerating && self.services.generation.is_some(),
                    egui::Button::new("Regenerate"),
                )
                .clicked()
            {
                self.dispatch_regenerate(ctx, tab);
            }
            if regenerating {
                ui.add(egui::Spinner::new().size(14.0));
            }
        });
        ui.separator();

        let Some(tree_key) = tab.tree_key() else {
            return;
        };
        let base = EditPath::parse(tree_key);
        let root = if matches!(tab, Tab::Image)
            && self.reconciler.current().get(tree_key).is_none()
        {
            // The image pseudo-tab edits its reserved subtree even before
            // the tree carries one; materialize the default shape.
            crate::app::config_tree::apply_edit(
                self.reconciler.current(),
                &base,
                tab_projection::default_image_shape(),
            )
        } else {
            self.reconciler.current().clone()
        };

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.tree_editor.ui(ui, &root, &base, locked);
            });
    }

    fn render_app_details_tab(&mut self, ui: &mut egui::Ui) {
        let Some(app) = self.selected_app().cloned() else {
            ui.weak("App record not loaded");
            return;
        };
        let draft = self.reconciler.details_draft().clone();
        let locked = self.services.identity.current_user().is_none();

        egui::Grid::new("app_details_grid")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                ui.label("App ID");
                ui.label(&app.app_id);
                ui.end_row();

                let mut app_name = draft.app_name.clone().unwrap_or(app.app_name.clone());
                ui.label("App Name");
                if ui
                    .add_enabled(!locked, egui::TextEdit::singleline(&mut app_name))
                    .changed()
                {
                    self.reconciler
                        .edit_details(|d| d.app_name = Some(app_name.clone()));
                }
                ui.end_row();

                let mut package_name = draft
                    .package_name
                    .clone()
                    .unwrap_or(app.package_name.clone());
                ui.label("Package Name");
                if ui
                    .add_enabled(!locked, egui::TextEdit::singleline(&mut package_name))
                    .changed()
                {
                    self.reconciler
                        .edit_details(|d| d.package_name = Some(package_name.clone()));
                }
                ui.end_row();

                let mut description = draft
                    .description
                    .clone()
                    .unwrap_or(app.meta.description.clone());
                ui.label("Description");
                if ui
                    .add_enabled(!locked, egui::TextEdit::multiline(&mut description))
                    .changed()
                {
                    self.reconciler
                        .edit_details(|d| d.description = Some(description.clone()));
                }
                ui.end_row();

                let mut play_url = draft.play_url.clone().unwrap_or(app.meta.play_url.clone());
                ui.label("Play URL");
                if ui
                    .add_enabled(!locked, egui::TextEdit::singleline(&mut play_url))
                    .changed()
                {
                    self.reconciler
                        .edit_details(|d| d.play_url = Some(play_url.clone()));
                }
                ui.end_row();

                let mut app_store_url = draft
                    .app_store_url
                    .clone()
                    .unwrap_or(app.meta.app_store_url.clone());
                ui.label("App Store URL");
                if ui
                    .add_enabled(!locked, egui::TextEdit::singleline(&mut app_store_url))
                    .changed()
                {
                    self.reconciler
                        .edit_details(|d| d.app_store_url = Some(app_store_url.clone()));
                }
                ui.end_row();
            });
    }

    fn render_bottom_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let state = self.reconciler.state();
                let saving = state == SyncState::Saving;
                let dirty = self.reconciler.has_unsaved_changes()
                    || self.tree_editor.has_pending();

                if ui
                    .add_enabled(dirty && !saving, egui::Button::new("Save"))
                    .clicked()
                {
                    self.dispatch_save(ctx);
                }
                if ui
                    .add_enabled(dirty && !saving, egui::Button::new("Discard"))
                    .clicked()
                {
                    self.tree_editor.reset();
                    self.reconciler.discard();
                }

                match state {
                    SyncState::Clean => {
                        ui.weak("All changes saved");
                    }
                    SyncState::Dirty => {
                        ui.colored_label(
                            egui::Color32::from_rgb(255, 150, 0),
                            "Unsaved changes",
                        );
                    }
                    SyncState::Saving => {
                        ui.add(egui::Spinner::new().size(14.0));
                        ui.weak("Saving…");
                    }
                    SyncState::Error => {
                        ui.colored_label(
                            egui::Color32::from_rgb(220, 50, 50),
                            self.reconciler
                                .last_error()
                                .unwrap_or("Last save failed")
                                .to_string(),
                        );
                    }
                }

                self.render_translate_menu(ctx, ui);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.notification_manager.render_status_bar_indicator(ui);
                });
            });
        });
    }

    fn render_translate_menu(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        if self.reconciler.app_id().is_none() || self.services.generation.is_none() {
            return;
        }
        ui.separator();
        let languages = self.settings.translation_languages.clone();
        ui.menu_button("Translate", |ui| {
            for language in &languages {
                let translating = self.pending_ops.is_translating(language);
                let translated = self.pending_ops.is_translated(language);
                let label = if translating {
                    format!("⟳ {}", language)
                } else if translated {
                    format!("✓ {}", language)
                } else {
                    language.clone()
                };
                if ui
                    .add_enabled(!translating && !translated, egui::Button::new(label))
                    .clicked()
                {
                    self.dispatch_translate(ctx, language);
                }
            }
        });
    }

    /// Confirmation gate raised when selecting another app while dirty.
    fn render_switch_gate(&mut self, ctx: &egui::Context) {
        let Some(target) = self.reconciler.pending_switch().map(String::from) else {
            return;
        };
        let target_name = self
            .apps
            .iter()
            .find(|a| a.app_id == target)
            .map(|a| a.app_name.clone())
            .unwrap_or_else(|| target.clone());

        egui::Window::new("Unsaved Changes")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Switching to \"{}\" will discard your unsaved changes.",
                    target_name
                ));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Discard and Switch").clicked() {
                        if let Some(target) = self.reconciler.confirm_switch() {
                            self.tree_editor.reset();
                            self.dispatch_load_config(ctx, &target);
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        self.reconciler.cancel_switch();
                    }
                });
            });
    }

    fn render_delete_gate(&mut self, ctx: &egui::Context) {
        let Some(app_id) = self.confirm_delete.clone() else {
            return;
        };
        let app_name = self
            .apps
            .iter()
            .find(|a| a.app_id == app_id)
            .map(|a| a.app_name.clone())
            .unwrap_or_else(|| app_id.clone());

        egui::Window::new("Delete App")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Delete \"{}\" and its campaign config? This cannot be undone.",
                    app_name
                ));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        self.confirm_delete = None;
                        let store = self.services.store.clone();
                        self.spawn_worker(ctx, move || WorkerEvent::AppDeleted {
                            result: store.delete_app(&app_id),
                            app_id,
                        });
                    }
                    if ui.button("Cancel").clicked() {
                        self.confirm_delete = None;
                    }
                });
            });
    }

    fn handle_app_form_window(&mut self, ctx: &egui::Context) {
        let window_id = self.app_form_window.window_id();
        let bring_to_front = self.window_focus_manager.should_bring_to_front(window_id);
        let result = self.app_form_window.show(ctx, bring_to_front);
        if bring_to_front {
            self.window_focus_manager.clear_bring_to_front(window_id);
        }
        if let Some(result) = result {
            let store = self.services.store.clone();
            match result {
                AppFormResult::Create(fields) => {
                    self.spawn_worker(ctx, move || {
                        WorkerEvent::AppCreated(store.create_app(&fields))
                    });
                }
                AppFormResult::Update { app_id, fields } => {
                    self.spawn_worker(ctx, move || {
                        WorkerEvent::AppUpdated(store.update_app(&app_id, &fields))
                    });
                }
            }
        }
    }

    fn handle_json_editor_window(&mut self, ctx: &egui::Context) {
        let window_id = self.json_editor_window.window_id();
        let bring_to_front = self.window_focus_manager.should_bring_to_front(window_id);
        self.json_editor_window.show(ctx, self.theme, bring_to_front);
        if bring_to_front {
            self.window_focus_manager.clear_bring_to_front(window_id);
        }
        if let Some((tree_key, subtree)) = self.json_editor_window.take_saved() {
            self.reconciler
                .replace_subtree(&EditPath::parse(&tree_key), subtree);
            self.tree_editor.reset();
        }
    }
}

impl eframe::App for ConsoleApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            self.apply_theme(ctx);
            self.theme_applied = true;
        }

        if !self.apps_requested {
            self.apps_requested = true;
            self.dispatch_list_apps(ctx);
        }

        self.handle_worker_events();

        // Debounced edits whose quiet window elapsed propagate into the
        // working tree here.
        for edit in self.tree_editor.take_ready() {
            self.reconciler.apply_edit(&edit.path, edit.value);
        }

        if let Some(action) = self.notification_manager.take_requested_retry() {
            self.handle_retry(ctx, action);
        }

        self.render_top_menu_bar(ctx);
        self.render_bottom_bar(ctx);
        self.render_app_list(ctx);
        self.render_central_panel(ctx);

        self.handle_app_form_window(ctx);
        self.handle_json_editor_window(ctx);
        self.render_switch_gate(ctx);
        self.render_delete_gate(ctx);
        NotificationDetailsWindow::show(&mut self.notification_manager, ctx);

        // Keep frames coming while a debounce window is open so the edit
        // propagates even without further input.
        if self.tree_editor.has_pending() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

impl Drop for ConsoleApp {
    fn drop(&mut self) {
        // Teardown flush: a keystroke still inside its debounce window is
        // written through instead of dropped.
        let edits = self.tree_editor.flush();
        for edit in edits {
            self.reconciler.apply_edit(&edit.path, edit.value);
        }
        if self.reconciler.has_unsaved_changes() {
            warn!("exiting with unsaved changes");
        }
    }
}

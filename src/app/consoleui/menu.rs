use crate::app::apps::App;
use crate::app::consoleui::app::ThemeChoice;
use crate::app::identity::User;
use eframe::egui;
use egui::{Color32, RichText};

#[derive(Debug, PartialEq)]
pub enum MenuAction {
    None,
    ThemeChanged,
    NewApp,
    EditApp,
    DeleteApp,
    RefreshApps,
    Logout,
    Quit,
}

pub fn build_menu(
    ui: &mut egui::Ui,
    ctx: &egui::Context,
    theme: &mut ThemeChoice,
    selected_app: Option<&App>,
    user: Option<&User>,
    store_label: &str,
) -> MenuAction {
    let mut menu_action = MenuAction::None;
    let original_theme = *theme;

    ui.menu_button("Console", |ui| {
        if ui.button("New App").clicked() {
            menu_action = MenuAction::NewApp;
        }
        if ui
            .add_enabled(selected_app.is_some(), egui::Button::new("Edit App"))
            .clicked()
        {
            menu_action = MenuAction::EditApp;
        }
        if ui
            .add_enabled(selected_app.is_some(), egui::Button::new("Delete App"))
            .clicked()
        {
            menu_action = MenuAction::DeleteApp;
        }
        ui.separator();
        if ui.button("Refresh Apps").clicked() {
            menu_action = MenuAction::RefreshApps;
        }
        ui.separator();
        if ui.button("Quit").clicked() {
            menu_action = MenuAction::Quit;
        }
    });

    ui.menu_button(RichText::new("🎨").size(18.0), |ui| {
        if ui.button("Latte").clicked() {
            catppuccin_egui::set_theme(ctx, catppuccin_egui::LATTE);
            *theme = ThemeChoice::Latte;
        }
        if ui.button("Frappe").clicked() {
            catppuccin_egui::set_theme(ctx, catppuccin_egui::FRAPPE);
            *theme = ThemeChoice::Frappe;
        }
        if ui.button("Macchiato").clicked() {
            catppuccin_egui::set_theme(ctx, catppuccin_egui::MACCHIATO);
            *theme = ThemeChoice::Macchiato;
        }
        if ui.button("Mocha").clicked() {
            catppuccin_egui::set_theme(ctx, catppuccin_egui::MOCHA);
            *theme = ThemeChoice::Mocha;
        }
    });

    // Sign-in status indicator
    show_user_status(ui, user);
    if user.is_some() {
        if ui.button(RichText::new("Sign Out").size(12.0)).clicked() {
            menu_action = MenuAction::Logout;
        }
    }

    ui.separator();
    ui.label(RichText::new(store_label).size(11.0).weak());

    ui.add_space(16.0);

    // Display selected app info if available
    if let Some(app) = selected_app {
        ui.horizontal(|ui| {
            ui.label("App:");
            ui.label(
                RichText::new(&app.app_name)
                    .color(Color32::from_rgb(180, 140, 220))
                    .strong(),
            );
            ui.separator();
            ui.label(RichText::new(&app.package_name).color(Color32::from_rgb(100, 170, 255)));
        });
    }

    if menu_action != MenuAction::None {
        menu_action
    } else if original_theme != *theme {
        MenuAction::ThemeChanged
    } else {
        MenuAction::None
    }
}

/// Displays the signed-in user indicator.
fn show_user_status(ui: &mut egui::Ui, user: Option<&User>) {
    let (status_text, text_color) = match user {
        Some(user) => (user.display_name.clone(), Color32::from_rgb(50, 200, 80)),
        None => ("Not Signed In".to_string(), Color32::from_rgb(180, 180, 180)),
    };

    let response = ui.label(
        RichText::new(status_text)
            .strong()
            .size(12.0)
            .color(text_color),
    );

    if let Some(user) = user {
        response.on_hover_text(format!("Signed in as {}", user.email));
    } else {
        response.on_hover_text("Sign-in is handled by the external identity provider");
    }
}

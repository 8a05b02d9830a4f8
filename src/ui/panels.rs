use eframe::egui::{self, Align2, Color32, RichText, ScrollArea, Ui};

use crate::data::export::SaveDialogSink;
use crate::data::model::ListingStore;
use crate::state::{AppState, RENT_BUCKETS};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

fn rooms_label(rooms: f64) -> String {
    format!("{rooms}p")
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtres");
    ui.separator();

    if state.store.is_none() {
        ui.label("Chargement…");
        return;
    }

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Recherche");
            changed |= ui
                .add(
                    egui::TextEdit::singleline(&mut state.controls.search)
                        .hint_text("Adresse, description…"),
                )
                .changed();
            ui.add_space(6.0);

            ui.strong("Loyer");
            let current = RENT_BUCKETS
                .iter()
                .find(|(value, _)| *value == state.controls.rent)
                .map_or(state.controls.rent.as_str(), |(_, label)| *label)
                .to_string();
            egui::ComboBox::from_id_salt("filter_rent")
                .selected_text(current)
                .show_ui(ui, |ui: &mut Ui| {
                    for (value, label) in RENT_BUCKETS {
                        changed |= ui
                            .selectable_value(&mut state.controls.rent, value.to_string(), *label)
                            .changed();
                    }
                });
            ui.add_space(6.0);

            ui.strong("Pièces");
            let current = if state.controls.rooms.is_empty() {
                "Toutes".to_string()
            } else {
                format!("{}p", state.controls.rooms)
            };
            egui::ComboBox::from_id_salt("filter_rooms")
                .selected_text(current)
                .show_ui(ui, |ui: &mut Ui| {
                    changed |= ui
                        .selectable_value(&mut state.controls.rooms, String::new(), "Toutes")
                        .changed();
                    for &rooms in &state.room_options {
                        changed |= ui
                            .selectable_value(
                                &mut state.controls.rooms,
                                rooms.to_string(),
                                rooms_label(rooms),
                            )
                            .changed();
                    }
                });
            ui.add_space(6.0);

            ui.strong("Meublé");
            let current = if state.controls.furnished.is_empty() {
                "Indifférent".to_string()
            } else {
                state.controls.furnished.clone()
            };
            egui::ComboBox::from_id_salt("filter_furnished")
                .selected_text(current)
                .show_ui(ui, |ui: &mut Ui| {
                    changed |= ui
                        .selectable_value(
                            &mut state.controls.furnished,
                            String::new(),
                            "Indifférent",
                        )
                        .changed();
                    for value in &state.furnished_options {
                        changed |= ui
                            .selectable_value(
                                &mut state.controls.furnished,
                                value.clone(),
                                value.as_str(),
                            )
                            .changed();
                    }
                });
            ui.add_space(6.0);

            changed |= ui
                .checkbox(&mut state.sort_by_rent, "Trier par loyer")
                .changed();

            ui.separator();
            if ui.button("Réinitialiser").clicked() {
                state.on_reset();
            }

            ui.separator();
            ui.strong("Portails");
            for (portal, color) in state.portal_colors.entries() {
                ui.label(RichText::new(format!("● {portal}")).color(color));
            }
        });

    if changed {
        state.on_filter_changed();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Fichier", |ui: &mut Ui| {
            if ui.button("Ouvrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Exporter CSV").clicked() {
                state.on_export_csv(&mut SaveDialogSink);
                ui.close_menu();
            }
            if ui.button("Exporter JSON").clicked() {
                state.on_export_json(&mut SaveDialogSink);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.store.is_some() {
            let filtered = if state.controls.to_spec().is_unconstrained() {
                ""
            } else {
                " (filtré)"
            };
            ui.label(format!(
                "{} annonces affichées sur {}{filtered}",
                state.visible_indices.len(),
                state.total()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Statistics strip
// ---------------------------------------------------------------------------

/// Format an amount with `'` as thousands separator, Swiss style.
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('\'');
        }
        out.push(ch);
    }
    if rounded < 0 {
        out.insert(0, '-');
    }
    out
}

/// Render the four summary figures, or nothing when there are none.
pub fn stats_bar(ui: &mut Ui, state: &AppState) {
    let Some(summary) = &state.summary else {
        ui.label(RichText::new("Aucune statistique disponible").weak());
        return;
    };

    let surface = if summary.average_surface.is_finite() {
        format!("{}m²", summary.average_surface)
    } else {
        "n/a".to_string()
    };
    let best = summary
        .best_deal
        .map_or("n/a".to_string(), |d| format!("CHF {d:.1}/m²"));

    ui.horizontal(|ui: &mut Ui| {
        stat(ui, "Loyer moyen", &format!("CHF {}", format_thousands(summary.average_rent)));
        ui.separator();
        stat(ui, "Surface moyenne", &surface);
        ui.separator();
        stat(ui, "Meilleur prix", &best);
        ui.separator();
        stat(ui, "Portails", &format!("{} sources", summary.portal_count));
    });
}

fn stat(ui: &mut Ui, title: &str, value: &str) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(title).small().weak());
        ui.label(RichText::new(value).strong().size(18.0));
    });
}

// ---------------------------------------------------------------------------
// Notification window
// ---------------------------------------------------------------------------

/// Show the pending notification, if any, until the user dismisses it.
pub fn notification(ctx: &egui::Context, state: &mut AppState) {
    let Some(message) = state.notification.clone() else {
        return;
    };
    egui::Window::new("Information")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui: &mut Ui| {
            ui.label(message);
            if ui.button("OK").clicked() {
                state.notification = None;
            }
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Ouvrir des annonces")
        .add_filter("Fichiers pris en charge", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.reload(ListingStore::load_or_empty(&path));
    }
}

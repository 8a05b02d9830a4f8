use eframe::egui::{Align, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{fields, render_text};
use crate::state::AppState;
use crate::ui::panels::format_thousands;

// ---------------------------------------------------------------------------
// Listing table (central panel)
// ---------------------------------------------------------------------------

const HEADERS: [&str; 7] = [
    "Loyer",
    "Pièces",
    "Surface",
    "Adresse",
    "Description",
    "Annonce",
    "Portail",
];

/// Render the visible listings, one row each.
pub fn listing_table(ui: &mut Ui, state: &AppState) {
    let Some(store) = &state.store else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Chargement des annonces…");
        });
        return;
    };

    if state.visible_indices.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("Aucune annonce ne correspond à vos critères");
        });
        return;
    }

    let listings = store.listings();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::initial(200.0).clip(true))
        .column(Column::initial(260.0).clip(true))
        .column(Column::auto())
        .column(Column::remainder())
        .header(22.0, |mut header| {
            for title in HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(20.0, state.visible_indices.len(), |mut row| {
                let listing = &listings[state.visible_indices[row.index()]];
                let portal = listing.source_portal();

                row.col(|ui: &mut Ui| {
                    ui.label(
                        RichText::new(format!("CHF {}", format_thousands(listing.rent()))).strong(),
                    );
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{}p", render_text(listing.get(fields::ROOMS))));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{}m²", render_text(listing.get(fields::SURFACE))));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(listing.address());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(listing.short_description());
                });
                row.col(|ui: &mut Ui| {
                    let url = listing.listing_url();
                    if !url.is_empty() {
                        ui.hyperlink_to("Voir 🔗", url);
                    }
                });
                row.col(|ui: &mut Ui| {
                    let color = state.portal_colors.color_for(portal.as_deref());
                    ui.label(RichText::new(portal.as_deref().unwrap_or("")).color(color));
                });
            });
        });
}

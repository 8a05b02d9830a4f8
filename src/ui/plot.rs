use std::collections::BTreeMap;

use eframe::egui::Ui;
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Rent / surface scatter (bottom panel)
// ---------------------------------------------------------------------------

/// Scatter of surface (x) against rent (y) for the visible listings, one
/// series per portal. Listings without numeric rent or surface are skipped.
pub fn rent_surface_plot(ui: &mut Ui, state: &AppState) {
    if state.store.is_none() {
        return;
    }

    let mut series: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for listing in state.visible_listings() {
        let (surface, rent) = (listing.surface(), listing.rent());
        if surface.is_finite() && rent.is_finite() {
            series
                .entry(listing.source_portal().unwrap_or_default())
                .or_default()
                .push([surface, rent]);
        }
    }

    Plot::new("rent_surface_plot")
        .legend(Legend::default())
        .x_axis_label("Surface (m²)")
        .y_axis_label("Loyer (CHF)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (portal, points) in series {
                let color = state.portal_colors.color_for(Some(portal.as_str()));
                let points = Points::new(PlotPoints::from(points))
                    .name(&portal)
                    .color(color)
                    .radius(3.5);
                plot_ui.points(points);
            }
        });
}

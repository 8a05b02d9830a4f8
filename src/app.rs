use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyListingsApp {
    pub state: AppState,
}

impl RustyListingsApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for RustyListingsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + statistics ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
            ui.separator();
            panels::stats_bar(ui, &self.state);
            ui.add_space(4.0);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: rent / surface scatter ----
        egui::TopBottomPanel::bottom("plot_panel")
            .default_height(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                plot::rent_surface_plot(ui, &self.state);
            });

        // ---- Central panel: listing table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::listing_table(ui, &self.state);
        });

        panels::notification(ctx, &mut self.state);
    }
}

use eframe::egui;

use crate::ui::{panels, results};
use safmr_finder::state::AppState;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SafmrFinderApp {
    pub state: AppState,
}

impl SafmrFinderApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SafmrFinderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Widgets only record what the user did; the state reacts afterwards.
        let mut actions = Vec::new();

        // ---- Top panel: menu bar + mode switch ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state, &mut actions);
        });

        // ---- Left side panel: query inputs ----
        egui::SidePanel::left("query_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &mut actions);
            });

        // ---- Central panel: results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            results::results_view(ui, &self.state, &mut actions);
        });

        for action in actions {
            self.state.apply(action);
        }
    }
}

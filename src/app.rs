use eframe::egui;

use crate::dashboard::PanelId;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

const HALF_HEIGHT: f32 = 320.0;
const MAIN_HEIGHT: f32 = 460.0;

pub struct EstuaryApp {
    pub state: AppState,
}

impl EstuaryApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for EstuaryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and dataset buttons ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: overview and the five charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::overview(ui, &mut self.state);
                    ui.separator();

                    ui.columns(2, |cols| {
                        panels::chart_panel(&mut cols[0], &mut self.state, PanelId::Histo, HALF_HEIGHT);
                        panels::chart_panel(&mut cols[1], &mut self.state, PanelId::Dense, HALF_HEIGHT);
                    });
                    ui.separator();
                    panels::chart_panel(ui, &mut self.state, PanelId::Main, MAIN_HEIGHT);
                    ui.separator();
                    ui.columns(2, |cols| {
                        panels::chart_panel(&mut cols[0], &mut self.state, PanelId::Pie, HALF_HEIGHT);
                        panels::chart_panel(&mut cols[1], &mut self.state, PanelId::Scatter, HALF_HEIGHT);
                    });
                });
        });

        // ---- Help overlays ----
        panels::help_windows(ctx, &mut self.state);
    }
}

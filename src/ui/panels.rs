use eframe::egui::{self, Color32, RichText, Ui};

use crate::dashboard::{DatasetId, PanelId};
use crate::state::AppState;
use crate::ui::plot;

const OVERVIEW: &str = "\
Environment and Climate Change Canada simulates extreme water levels in the St. Lawrence \
fluvial estuary, where hydrological, meteorological and tidal processes interact. Fine-scale \
2D simulations are only feasible for a limited set of short extreme events, so this dashboard \
explores event characteristics to help classify events and, in turn, stations.

The domain runs about 450 km from Montreal to Saint-Joseph-de-la-Rive, in four sections:";

const SECTIONS: [&str; 4] = [
    "Montreal region: Lake Ontario outflow and Ottawa River streamflow drive the levels.",
    "Varennes to Trois-Rivieres: long-term hydrological trends and the annual cycle, including Lac Saint-Pierre.",
    "Trois-Rivieres to Quebec: semi-diurnal and diurnal tides plus river streamflow variability.",
    "Ile d'Orleans to Saint-Joseph-de-la-Rive: brackish to salt water, tides and storm waves dominate.",
];

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, dataset buttons and status.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data directory…").clicked() {
                open_data_dir_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for id in DatasetId::ALL {
            if ui.selectable_label(state.active == id, id.label()).clicked() {
                state.select_dataset(id);
            }
        }

        ui.separator();
        ui.label(state.sources.summary());

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Collapsible application overview.
pub fn overview(ui: &mut Ui, state: &mut AppState) {
    let header = egui::CollapsingHeader::new(RichText::new("Application overview").strong())
        .open(Some(state.show_overview))
        .show(ui, |ui: &mut Ui| {
            ui.label(OVERVIEW);
            for (i, section) in SECTIONS.iter().enumerate() {
                ui.label(format!("{}. {section}", i + 1));
            }
        })
        .header_response;
    if header.clicked() {
        state.show_overview = !state.show_overview;
    }
}

// ---------------------------------------------------------------------------
// Chart panels
// ---------------------------------------------------------------------------

/// One panel: heading with help button, optional frame slider, then the chart
/// or its error.
pub fn chart_panel(ui: &mut Ui, state: &mut AppState, panel: PanelId, height: f32) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(panel.heading());
        if ui.small_button("?").on_hover_text("About this plot").clicked() {
            state.toggle_help(panel);
        }
    });

    let current = state.panels.get(panel);
    ui.label(RichText::new(&current.title).italics());

    let frames = state.frame_count(panel);
    let mut frame = state.frame_of(panel);
    if frames > 1 {
        let key = current
            .result
            .as_ref()
            .ok()
            .and_then(|spec| spec.frame_keys().get(frame).cloned())
            .unwrap_or_default();
        let slider = egui::Slider::new(&mut frame, 0..=frames - 1)
            .show_value(false)
            .text(key);
        if ui.add(slider).changed() {
            state.set_frame(panel, frame);
        }
    }

    match &state.panels.get(panel).result {
        Ok(spec) => plot::chart(ui, panel.as_str(), spec, frame, height),
        Err(e) => {
            ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.label(RichText::new(format!("Error: {e}")).color(Color32::RED));
                });
            });
        }
    }
}

/// Help overlays for every panel whose help is open.
pub fn help_windows(ctx: &egui::Context, state: &mut AppState) {
    for panel in PanelId::ALL {
        let mut open = state.help_open[panel as usize];
        if !open {
            continue;
        }
        let mut close = false;
        egui::Window::new("About this plot")
            .id(egui::Id::new(("help", panel.as_str())))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui: &mut Ui| {
                ui.strong(panel.heading());
                ui.label(panel.help());
                if ui.button("Close").clicked() {
                    close = true;
                }
            });
        if close || !open {
            state.close_help(panel);
        }
    }
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_data_dir_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open data directory")
        .set_directory(&state.config.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        state.reload_sources(dir);
    }
}

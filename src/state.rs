use std::path::PathBuf;

use crate::catalog::StationCatalog;
use crate::config::DashboardConfig;
use crate::dashboard::{DatasetId, PanelId, PanelSet, build_panels};
use crate::data::sources::Sources;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    pub catalog: StationCatalog,

    /// Source tables, read-only after load.
    pub sources: Sources,

    /// Dataset whose panels are shown.
    pub active: DatasetId,

    /// Panels of the active dataset (cached until the next selection).
    pub panels: PanelSet,

    /// Help overlay visibility, per panel.
    pub help_open: [bool; 5],

    /// Selected animation frame, per panel.
    pub frame_index: [usize; 5],

    pub show_overview: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig, catalog: StationCatalog, sources: Sources, initial: DatasetId) -> Self {
        let panels = build_panels(initial, &sources, &catalog);
        let mut state = Self {
            config,
            catalog,
            sources,
            active: initial,
            panels,
            help_open: [false; 5],
            frame_index: [0; 5],
            show_overview: true,
            status_message: None,
        };
        state.refresh_status();
        state
    }

    /// Switch dataset and rebuild its five panels.
    pub fn select_dataset(&mut self, id: DatasetId) {
        self.active = id;
        self.panels = build_panels(id, &self.sources, &self.catalog);
        self.frame_index = [0; 5];
        self.refresh_status();
    }

    /// Reload every source from `dir` and rebuild the active dataset.
    pub fn reload_sources(&mut self, dir: PathBuf) {
        log::info!("Loading sources from {}", dir.display());
        self.sources = Sources::load(&dir, &self.config.files);
        self.config.data_dir = dir;
        self.select_dataset(self.active);
    }

    pub fn toggle_help(&mut self, panel: PanelId) {
        let open = &mut self.help_open[panel as usize];
        *open = !*open;
    }

    pub fn close_help(&mut self, panel: PanelId) {
        self.help_open[panel as usize] = false;
    }

    /// Frame shown for a panel, clamped to the frames it has.
    pub fn frame_of(&self, panel: PanelId) -> usize {
        let count = self.frame_count(panel);
        self.frame_index[panel as usize].min(count.saturating_sub(1))
    }

    pub fn set_frame(&mut self, panel: PanelId, index: usize) {
        self.frame_index[panel as usize] = index;
    }

    pub fn frame_count(&self, panel: PanelId) -> usize {
        self.panels
            .get(panel)
            .result
            .as_ref()
            .map_or(0, |spec| spec.frame_keys().len())
    }

    fn refresh_status(&mut self) {
        let failed = self.panels.failures();
        self.status_message = (failed > 0).then(|| format!("{failed} of 5 panels could not be built"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(
            DashboardConfig::default(),
            StationCatalog::st_lawrence(),
            Sources::default(),
            DatasetId::Coastal,
        )
    }

    #[test]
    fn test_help_toggles_per_panel() {
        let mut s = state();
        s.toggle_help(PanelId::Main);
        assert_eq!(s.help_open, [false, false, true, false, false]);
        s.toggle_help(PanelId::Main);
        assert!(!s.help_open[PanelId::Main as usize]);
        s.toggle_help(PanelId::Pie);
        s.close_help(PanelId::Pie);
        assert_eq!(s.help_open, [false; 5]);
    }

    #[test]
    fn test_select_dataset_resets_frames() {
        let mut s = state();
        s.set_frame(PanelId::Histo, 3);
        s.select_dataset(DatasetId::Music);
        assert_eq!(s.active, DatasetId::Music);
        assert_eq!(s.panels.dataset, DatasetId::Music);
        assert_eq!(s.frame_index, [0; 5]);
        // nothing loaded: every panel fails and the frame clamps to 0
        assert_eq!(s.frame_of(PanelId::Histo), 0);
        assert_eq!(s.status_message.as_deref(), Some("5 of 5 panels could not be built"));
    }
}

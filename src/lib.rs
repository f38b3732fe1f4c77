//! Interactive dashboard of extreme water-level events along the
//! St. Lawrence, with two auxiliary demonstration datasets.
//!
//! Source files are loaded once into [`data::sources::Sources`]; selecting a
//! [`dashboard::DatasetId`] runs its derivation pipeline and builds five
//! declarative [`chart::ChartSpec`]s, which the egui front end draws and the
//! CLI can export as JSON.

pub mod app;
pub mod catalog;
pub mod chart;
pub mod color;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod recipes;
pub mod state;
pub mod transform;
pub mod ui;

//! Browse-image grid planner service library.
//!
//! This module exposes the internal modules for testing purposes.

pub mod config_loader;
pub mod plan;

pub use config_loader::{load_input_metadata, load_request, load_tiling_config};
pub use plan::{build_plan, BrowsePlan, PlannedTile};

//! Utility modules for icebreaker

pub mod grid_map;

pub use grid_map::*;

// Path Planning algorithms module

pub mod a_star;
pub mod cost_model;
pub mod heuristic;

pub use a_star::*;
pub use cost_model::*;

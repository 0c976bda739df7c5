//! Common types, traits, configuration and error definitions for icebreaker
//!
//! This module provides the foundational building blocks shared by the
//! grid, the planners and the replanning controller.

pub mod types;
pub mod traits;
pub mod error;
pub mod config;

pub use types::*;
pub use traits::*;
pub use error::*;
pub use config::*;

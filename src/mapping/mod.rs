// World generation module

pub mod ice_field;

pub use ice_field::*;

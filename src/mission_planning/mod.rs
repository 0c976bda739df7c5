// Mission planning module

pub mod replanner;

pub use replanner::*;

pub mod compare;
pub mod config;
pub mod diff;
pub mod metrics;
pub mod model;
pub mod parser;
pub mod tree;
pub mod utils;

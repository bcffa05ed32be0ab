pub mod aggregate;
pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod keys;
pub mod layout;
pub mod util;

pub mod config;
pub mod logging;

pub mod analytics;
pub mod api;
pub mod retry;
pub mod stream;
pub mod tree;
pub mod validity;

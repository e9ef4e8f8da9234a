pub mod cache;
pub mod config;
pub mod dataset;
pub mod error;
pub mod events;
pub mod extract;
pub mod fetch;
pub mod history;
pub mod outcome;
pub mod store;

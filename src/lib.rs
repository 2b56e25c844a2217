//! Dish server
//!
//! A small HTTP service keeping a collection of dishes in memory and
//! persisting it as one JSON file after every write.

pub mod api;
pub mod config;
pub mod logger;
pub mod server;
pub mod store;

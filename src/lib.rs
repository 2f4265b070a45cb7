//! NASA Astronomy Picture of the Day library
//!
//! The caching proxy (`server`, `proxy`, `cache`) and the terminal viewer
//! (`app`, `history`, `loader`, `ui`) share the picture model in `data`.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod history;
pub mod loader;
pub mod proxy;
pub mod server;
pub mod ui;

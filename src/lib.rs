// Library surface for the binary, headless drivers and integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod content;
pub mod game;
pub mod history;
pub mod runtime;
pub mod schedule;
pub mod session;
pub mod store;
pub mod typing;
pub mod ui;

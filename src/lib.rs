pub mod app;
pub mod celebrate;
pub mod cli;
pub mod config;
pub mod days;
pub mod display;
pub mod model;
pub mod notes;
pub mod prefs;
pub mod reorder;
pub mod stats;
pub mod storage;
pub mod tasks;
pub mod util;

pub use app::{App, run};

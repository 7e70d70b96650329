pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod recipes;
pub mod spoonacular;
pub mod state;
pub mod utils;
pub mod web;

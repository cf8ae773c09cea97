pub mod catalog;
pub mod config;
pub mod controller;
pub mod input;
pub mod launcher;
pub mod model;
pub mod settings;
pub mod sources;
pub mod style;

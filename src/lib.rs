//! Simulated neural-network training visualizer.
//!
//! The crate is split so everything except the egui shell can run headless:
//! [`session::Session`] owns the state, [`trainer::Trainer`] advances it on a
//! clock, and [`render`] draws it onto any [`render::Surface`].

pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod journal;
pub mod logging;
pub mod model;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod trainer;

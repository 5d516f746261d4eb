//! Game core: pure data, pure update functions, and a draw-call layer.
//!
//! The terminal front end in `main.rs` is the only place that touches I/O.

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod formation;
pub mod scene;

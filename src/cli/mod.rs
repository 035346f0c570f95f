//! Command Line Interface (CLI) layer for LANDSCENE.
//!
//! This module defines argument parsing (`args`), error types
//! (`errors`), and the orchestration logic (`runner`) for single-scene
//! and pool processing flows. It wires user-provided options to the
//! planning pipeline exposed via `landscene::api`.
//!
//! If you are embedding LANDSCENE into another application, prefer the
//! library API (`plan_scene`/`execute_plan`) over calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;

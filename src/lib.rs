#![forbid(unsafe_code)]

//! Configurator for an input-macro agent: profiles of presets, presets of
//! timed action slots, each slot gated by a flat boolean condition.

pub mod capture;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod gateway;
pub mod logs;
pub mod macros;
pub mod session;

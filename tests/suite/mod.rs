//! Integration test modules

mod combine;
mod config;
mod logging;
mod optional;
mod outcome;
mod pending;
mod rendering;

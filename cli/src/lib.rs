//! tradesim-cli: command-line front end for the tradesim simulator.
//!
//! Reads a simulation request from a TOML file, optionally derives the trade
//! edge from a JSON trade history, runs the Monte Carlo simulation and prints
//! a text summary or a JSON envelope.

pub mod commands;
pub mod config;
pub mod envelope;
pub mod error;
pub mod history;
pub mod report;

// This file is the module declaration file for the `core` module.
//
// `config` module:
// Defines `FixerConfig`, the explicit settings value passed to every
// component, and the `ConfigManager` that loads it from an optional TOML
// file and applies command-line overrides.
pub mod config;
pub mod engine;
pub mod error;

//! Configuration loading, env substitution, and startup validation.
//!
//! Config files: `wagate.toml`, `wagate.yaml`, or `wagate.json`
//! Searched in `./` then `~/.config/wagate/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values, plus
//! `WAGATE_*` environment overrides applied after parsing.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{apply_env_overrides, discover_and_load, load_config},
    schema::{DEFAULT_VERIFY_TOKEN, ServerConfig, WagateConfig, WhatsAppConfig},
    validate::{Diagnostic, Severity, validate},
};

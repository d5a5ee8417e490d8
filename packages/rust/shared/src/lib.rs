//! Shared types, error model, configuration and parameter schemas for SourceBridge.
//!
//! This crate is the foundation depended on by all other SourceBridge crates.
//! It provides:
//! - The unified error type, [`SourceBridgeError`]
//! - Domain types ([`Filter`], [`SchedulePolicy`], [`EntityRef`])
//! - Configuration ([`AppConfig`], [`PlatformIdentity`], config loading)
//! - The restricted ISO-8601 [`duration`] parser
//! - Declarative parameter schemas ([`ParamSpec`], [`Args`])

pub mod config;
pub mod duration;
pub mod error;
pub mod params;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, PlatformConfig, PlatformIdentity, config_dir, config_file_path,
    identity_from_lookup, init_config, load_config, load_config_from, load_identity,
    resolve_endpoint,
};
pub use error::{Result, SourceBridgeError};
pub use params::{Args, ParamKind, ParamSpec, input_schema, validate};
pub use types::{
    CONTENT_TYPES, DateRange, EntityRef, FILE_TYPES, Filter, GeoFilter, RecurrenceType,
    SchedulePolicy, SearchType, UsageRecord,
};

//! Politicos - Public Officials Salary Console
//!
//! A terminal client for the politicians salary dataset API: browse and
//! search the grid, edit or delete records, bulk import CSV files and
//! read the salary statistics.
//!
//! - **Gateway**: Typed REST client behind the [`api::PoliticiansApi`] trait
//! - **Cache**: Keyed query cache with per-entry lifetime, invalidated by mutations
//! - **Search**: URL-backed query state with debounced name search
//! - **Views**: Grid, dialogs and statistics models shared by TUI and CLI
//!
//! # Quick Start
//!
//! ```ignore
//! use politicos::{api::ApiClient, cache::QueryCache, config::Config, service::PoliticianService};
//! use std::sync::Arc;
//!
//! let config = Config::load(None)?;
//! let api = Arc::new(ApiClient::new(&config)?);
//! let service = PoliticianService::new(api, Arc::new(QueryCache::with_config(&config.cache)));
//! let stats = service.statistics().await?;
//! ```

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod search;
pub mod service;
pub mod telemetry;
pub mod testing;
pub mod tui;
pub mod view;

pub use api::types::{Gender, ListParams, PageResult, Politician, PoliticianUpdate, Statistics};
pub use config::Config;
pub use errors::PoliticosError;

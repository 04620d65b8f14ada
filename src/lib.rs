pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use adapters::storage::LocalStorage;
pub use config::ExportConfig;
pub use core::{
    bitable::BitableClient,
    etl::{EtlEngine, RunReport},
    normalize::{normalize, summarize, Summaries},
    pipeline::QrExportPipeline,
    render::QrRenderer,
};
pub use domain::model::{RawRecord, RecordPage, Summary, TokenResponse};
pub use utils::error::{ExportError, Result, SkipReason};

// 公开导出的模块，供外部使用
pub mod models;
pub mod errors;
pub mod config;
pub mod cli;
pub mod scrapers;
pub mod services;

#[doc(hidden)]
pub mod util;

// 重新导出常用类型，方便使用
pub use models::quote::{QuoteRecord, PageRange};
pub use errors::{Result, DataHubError};
pub use config::{ClientMode, FetchConfig, IngestConfig};

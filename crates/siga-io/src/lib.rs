//! # siga-io: loaders and sinks around `siga-core`
//!
//! - [`reader`]: Latin-1 / UTF-8 semicolon-delimited CSV -> [`siga_core::RawRecord`]
//! - [`export`]: normalized records -> comma-delimited CSV
//! - [`store`]: full-replace Arrow IPC table with a JSON manifest
//! - [`codes`]: generation-type code tables from TOML

pub mod codes;
pub mod export;
pub mod reader;
#[cfg(feature = "ipc")]
pub mod store;

pub use codes::{load_code_table, CodeTableConfig};
pub use export::{export_csv, write_csv, write_rows};
pub use reader::{parse_raw_table, read_raw_table, CsvSourceOptions, RawTable, SourceEncoding};
#[cfg(feature = "ipc")]
pub use store::{compute_sha256, records_to_dataframe, SourceInfo, StoreManifest, TableStore};

//! # siga-core: SIGA record normalization
//!
//! Cleans and types rows from ANEEL's SIGA registry of Brazilian generation
//! facilities. The crate is pure: it does no I/O and holds no global mutable
//! state. Loaders hand it [`RawRecord`]s (column name -> optional text) and
//! get back [`NormalizedRecord`]s ready for maps, charts or storage.
//!
//! ## Fallback policy
//!
//! Individual fields never fail:
//! - power columns that are missing or unparseable become `0.0`
//! - coordinates that are missing or unparseable become `None` (never `0.0`)
//! - unknown generation-type codes resolve through [`LabelFallback`]
//!
//! The only fatal condition is a required column missing from the batch
//! header ([`SigaError::MissingColumn`]).
//!
//! ## Quick Start
//!
//! ```
//! use siga_core::*;
//!
//! let raw = RawRecord::from_pairs([
//!     ("SigTipoGeracao", Some("EOL".to_string())),
//!     ("MdaPotenciaFiscalizadaKw", Some("2100,5".to_string())),
//!     ("NumCoordNEmpreendimento", Some("-5,79".to_string())),
//!     ("NumCoordEEmpreendimento", Some("-35,2".to_string())),
//! ]);
//! let record = normalize(&raw, &GenerationTypeTable::aneel());
//!
//! assert_eq!(record.generation_type_label, "Central Geradora Eólica");
//! assert_eq!(record.power_kw(), 2100.5);
//! assert_eq!(record.coordinates(), Some((-5.79, -35.2)));
//! ```

pub mod codes;
pub mod diagnostics;
pub mod error;
pub mod normalizer;
pub mod parse;
pub mod record;
pub mod summary;

pub use codes::{GenerationTypeTable, LabelFallback, DEFAULT_SENTINEL};
pub use diagnostics::{IssueKind, NormalizeDiagnostics, NormalizeIssue, NormalizeStats, Severity};
pub use error::{SigaError, SigaResult};
pub use normalizer::{normalize, normalize_batch, ColumnMap, NormalizedBatch, Normalizer};
pub use parse::parse_locale_float;
pub use record::{NormalizedRecord, RawRecord};
pub use summary::{MapPoint, PowerTotal};

//! Contract discovery over host workspace snapshots.
//!
//! A host frontend exports a [`snapshot::Workspace`]: source units with
//! their marker applications and call expressions, every type and constant
//! already resolved. This crate locates contract-declaration sites in a
//! snapshot, extracts normalized contract records from them, and either
//! merges them into an offline catalog ([`scan`]) or reports each record to
//! a catalog server as it is found ([`LiveAnalyzer`]).

pub mod error;
pub mod extract;
pub mod live;
pub mod locate;
pub mod report;
pub mod scan;
pub mod snapshot;

// Re-export key types for ergonomic use.
pub use msgmap_core::{CatalogEntry, ContractRecord, Direction};

pub use error::ScanError;
pub use extract::{evaluate_expression, extract, ArgValue};
pub use live::LiveAnalyzer;
pub use locate::{DeclarationSite, Locator, MarkerVocabulary};
pub use report::{ContractReporter, LogObserver, ReportObserver, ReporterConfig};
pub use scan::{scan, scan_with_cancel, CancelToken, ScanOptions};
pub use snapshot::{CallSite, ConstValue, Expr, MarkerSite, MarkerType, Project, SourceUnit, Workspace};

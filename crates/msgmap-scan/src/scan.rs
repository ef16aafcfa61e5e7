//! The offline scan pipeline: locate, extract, merge.
//!
//! Source units are independent until the merge step, which needs the full
//! record set; the pipeline therefore collects every record before handing
//! them to the merger. Cancellation is cooperative and checked between
//! source units -- a cancelled scan produces no partial catalog.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use msgmap_core::{merge, CatalogEntry, SchemaOptions, SchemaSynthesizer};

use crate::error::ScanError;
use crate::extract::extract;
use crate::locate::{Locator, MarkerVocabulary};
use crate::snapshot::Workspace;

/// Configuration for one offline scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub vocabulary: MarkerVocabulary,
    pub schema: SchemaOptions,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            vocabulary: MarkerVocabulary::default(),
            schema: SchemaOptions::scanner(),
        }
    }
}

/// Cooperative cancellation handle, checked between source units.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Scans a workspace snapshot into a merged catalog.
pub fn scan(workspace: &Workspace, options: &ScanOptions) -> Result<Vec<CatalogEntry>, ScanError> {
    scan_with_cancel(workspace, options, &CancelToken::new())
}

/// Like [`scan`], but aborts with [`ScanError::Cancelled`] at the next
/// source-unit boundary after `cancel` fires.
pub fn scan_with_cancel(
    workspace: &Workspace,
    options: &ScanOptions,
    cancel: &CancelToken,
) -> Result<Vec<CatalogEntry>, ScanError> {
    let locator = Locator::new(options.vocabulary.clone());
    let synthesizer = SchemaSynthesizer::new(options.schema.clone());

    let mut records = Vec::new();
    for project in &workspace.projects {
        for unit in &project.units {
            if cancel.is_cancelled() {
                return Err(ScanError::Cancelled);
            }
            for site in locator.unit_sites(project, unit) {
                if let Some(record) = extract(&site, &synthesizer)? {
                    records.push(record);
                }
            }
        }
    }

    tracing::debug!(records = records.len(), "scan extracted contract records");
    Ok(merge(records))
}

//! Live analysis: match, extract and report, one source unit at a time.
//!
//! The live path runs synchronously on whatever thread triggers analysis.
//! Each matched site produces exactly one outbound report -- no caching, no
//! batching, no merging; deduplication by identity key happens server-side
//! on ingest. Transport failures stay inside the reporter; the one error
//! that escapes is a malformed marker declaration.

use msgmap_core::{SchemaOptions, SchemaSynthesizer};

use crate::error::ScanError;
use crate::extract::extract;
use crate::locate::{Locator, MarkerVocabulary};
use crate::report::ContractReporter;
use crate::snapshot::{Project, SourceUnit};

/// Analyzes source units as they change and reports discovered contracts.
pub struct LiveAnalyzer {
    locator: Locator,
    synthesizer: SchemaSynthesizer,
    reporter: ContractReporter,
}

impl LiveAnalyzer {
    /// A live analyzer using the live schema preset (declared property
    /// order, no doc comments, no dynamic marker, no nullable unwrapping).
    pub fn new(vocabulary: MarkerVocabulary, reporter: ContractReporter) -> Self {
        LiveAnalyzer {
            locator: Locator::new(vocabulary),
            synthesizer: SchemaSynthesizer::new(SchemaOptions::live()),
            reporter,
        }
    }

    /// Analyzes one unit, reporting every extracted contract.
    ///
    /// Returns the number of reports fired. Report delivery is best-effort
    /// and does not affect the count.
    pub fn analyze_unit(&self, project: &Project, unit: &SourceUnit) -> Result<usize, ScanError> {
        let mut reported = 0;
        for site in self.locator.unit_sites(project, unit) {
            if let Some(record) = extract(&site, &self.synthesizer)? {
                self.reporter
                    .send(&record, project.compilation_id.as_deref());
                reported += 1;
            }
        }
        Ok(reported)
    }
}

//! Declaration location: finding candidate contract sites in a snapshot.
//!
//! Three independently matched shapes, unioned:
//! - declarative contract markers, matched by the marker's resolved base
//!   type against the configured marker base;
//! - an external framework's subscribe markers, matched the same way
//!   against the framework marker type;
//! - framework publish calls, matched by a deliberately loose heuristic:
//!   the callee member name and the receiver's static type display must
//!   both mention "publish" (case-insensitive).
//!
//! Which marker types count is a capability the caller injects via
//! [`MarkerVocabulary`]; the locator itself knows no host-specific names.

use msgmap_core::Direction;

use crate::snapshot::{CallSite, MarkerSite, Project, SourceUnit, Workspace};

/// The marker types one host ecosystem uses to declare contracts.
#[derive(Debug, Clone)]
pub struct MarkerVocabulary {
    /// Fully qualified base type of the declarative contract markers.
    pub contract_marker_base: String,
    /// Simple name of the publish-direction marker; any other subtype of
    /// the contract base declares a subscription.
    pub publish_marker: String,
    /// Fully qualified base type matched for the external framework's
    /// subscribe markers.
    pub framework_subscribe_marker: String,
}

impl Default for MarkerVocabulary {
    fn default() -> Self {
        MarkerVocabulary {
            contract_marker_base: "Messaging.Contracts.MessageAttribute".to_string(),
            publish_marker: "PublishesAttribute".to_string(),
            framework_subscribe_marker: "DotNetCore.CAP.CapSubscribeAttribute".to_string(),
        }
    }
}

/// One located candidate site, tagged with the shape that matched it.
#[derive(Debug, Clone, Copy)]
pub enum DeclarationSite<'a> {
    /// Declarative contract marker; direction fixed by the marker subtype.
    Marker {
        project: &'a Project,
        unit: &'a SourceUnit,
        site: &'a MarkerSite,
        direction: Direction,
    },
    /// External framework subscribe marker.
    FrameworkMarker {
        project: &'a Project,
        unit: &'a SourceUnit,
        site: &'a MarkerSite,
    },
    /// Framework publish call expression.
    Call {
        project: &'a Project,
        unit: &'a SourceUnit,
        site: &'a CallSite,
    },
}

/// Scans snapshots for candidate declaration sites.
pub struct Locator {
    vocabulary: MarkerVocabulary,
}

impl Locator {
    pub fn new(vocabulary: MarkerVocabulary) -> Self {
        Locator { vocabulary }
    }

    /// All candidate sites in a workspace: lazy, restartable, stable within
    /// a unit (markers in document order, then calls in document order).
    pub fn sites<'a>(&'a self, workspace: &'a Workspace) -> impl Iterator<Item = DeclarationSite<'a>> + 'a {
        workspace.projects.iter().flat_map(move |project| {
            project
                .units
                .iter()
                .flat_map(move |unit| self.unit_sites(project, unit))
        })
    }

    /// Candidate sites of a single source unit.
    pub fn unit_sites<'a>(
        &'a self,
        project: &'a Project,
        unit: &'a SourceUnit,
    ) -> impl Iterator<Item = DeclarationSite<'a>> + 'a {
        let markers = unit
            .markers
            .iter()
            .filter_map(move |site| self.match_marker(project, unit, site));
        let calls = unit
            .calls
            .iter()
            .filter(|site| is_publish_call(site))
            .map(move |site| DeclarationSite::Call { project, unit, site });
        markers.chain(calls)
    }

    fn match_marker<'a>(
        &self,
        project: &'a Project,
        unit: &'a SourceUnit,
        site: &'a MarkerSite,
    ) -> Option<DeclarationSite<'a>> {
        let base = site.marker.base_display.as_deref()?;
        if base == self.vocabulary.contract_marker_base {
            let direction = if site.marker.name == self.vocabulary.publish_marker {
                Direction::Publish
            } else {
                Direction::Subscribe
            };
            Some(DeclarationSite::Marker {
                project,
                unit,
                site,
                direction,
            })
        } else if base == self.vocabulary.framework_subscribe_marker {
            Some(DeclarationSite::FrameworkMarker { project, unit, site })
        } else {
            None
        }
    }
}

/// Both the invoked member and the receiver's static type must mention
/// "publish"; member name alone is too common a word to match on.
fn is_publish_call(site: &CallSite) -> bool {
    site.member_name.to_lowercase().contains("publish")
        && site.receiver_display.to_lowercase().contains("publish")
}

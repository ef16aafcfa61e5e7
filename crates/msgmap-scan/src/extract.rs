//! Contract extraction: turning a located site into a normalized record.
//!
//! Argument evaluation accepts a strict, ordered set of expression shapes
//! (literal, symbolic constant, type-of, name-of); anything else resolves
//! to absent, silently -- unresolvable dynamic arguments degrade to missing
//! fields rather than aborting the scan. Evaluated arguments map
//! positionally onto the matched marker's or callee's declared parameter
//! names; missing trailing arguments resolve to absent.
//!
//! The one hard failure is a marker with no discoverable constructor
//! parameter list: that is a configuration defect and aborts the scan.

use indexmap::IndexMap;

use msgmap_core::{ContractRecord, Direction, SchemaSynthesizer, TypeDescriptor};

use crate::error::ScanError;
use crate::locate::DeclarationSite;
use crate::snapshot::{CallSite, Expr, MarkerSite, Project, SourceUnit};

/// Conventional parameter names on declarative contract markers.
const MESSAGE_NAME_PARAM: &str = "messageName";
const MESSAGE_TYPE_PARAM: &str = "messageType";
const MODULE_NAME_PARAM: &str = "moduleName";
const MESSAGE_DESCRIPTION_PARAM: &str = "messageDescription";

/// Conventional parameter names on the framework's publish/subscribe API.
const FRAMEWORK_NAME_PARAM: &str = "name";
const FRAMEWORK_PAYLOAD_PARAM: &str = "contentObj";

/// A resolved argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue<'a> {
    /// A textual constant (literal, resolved symbolic constant, or the
    /// operand text of a name-extraction call).
    Text(String),
    /// A type, from a type-of expression.
    Type(&'a TypeDescriptor),
}

impl<'a> ArgValue<'a> {
    fn into_text(self) -> Option<String> {
        match self {
            ArgValue::Text(text) => Some(text),
            ArgValue::Type(_) => None,
        }
    }

    fn as_type(&self) -> Option<&'a TypeDescriptor> {
        match self {
            ArgValue::Type(ty) => Some(ty),
            ArgValue::Text(_) => None,
        }
    }
}

/// Resolves one argument expression to a concrete value.
///
/// First match wins: literal constant, symbolic constant reference (when
/// the host evaluated it), type-of, name-of. Every other shape -- including
/// an unevaluated constant reference -- resolves to `None` without error.
pub fn evaluate_expression(expr: &Expr) -> Option<ArgValue<'_>> {
    match expr {
        Expr::Literal { value } => Some(ArgValue::Text(value.to_string())),
        Expr::ConstRef { value, .. } => value.as_ref().map(|v| ArgValue::Text(v.to_string())),
        Expr::TypeOf { ty } => Some(ArgValue::Type(ty)),
        Expr::NameOf { operand } => Some(ArgValue::Text(operand.clone())),
        Expr::Other => None,
    }
}

/// Extracts a contract record from a located site.
///
/// Returns `Ok(None)` when the site's name argument evaluates to empty or
/// absent -- such sites carry no usable contract.
pub fn extract(
    site: &DeclarationSite<'_>,
    synthesizer: &SchemaSynthesizer,
) -> Result<Option<ContractRecord>, ScanError> {
    match site {
        DeclarationSite::Marker {
            project,
            unit,
            site,
            direction,
        } => extract_marker(project, unit, site, *direction, synthesizer),
        DeclarationSite::FrameworkMarker { project, unit, site } => {
            extract_framework_marker(project, unit, site, synthesizer)
        }
        DeclarationSite::Call { project, unit, site } => {
            Ok(extract_call(project, unit, site, synthesizer))
        }
    }
}

fn extract_marker(
    project: &Project,
    unit: &SourceUnit,
    site: &MarkerSite,
    direction: Direction,
    synthesizer: &SchemaSynthesizer,
) -> Result<Option<ContractRecord>, ScanError> {
    let args = marker_arguments(site)?;
    let Some(name) = text_arg(&args, MESSAGE_NAME_PARAM).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    let schema = type_arg(&args, MESSAGE_TYPE_PARAM).map(|ty| synthesizer.synthesize(ty));
    Ok(Some(ContractRecord {
        name,
        schema,
        description: text_arg(&args, MESSAGE_DESCRIPTION_PARAM),
        module: text_arg(&args, MODULE_NAME_PARAM),
        assembly: project.assembly.clone(),
        location: site_location(unit, site.line),
        direction,
    }))
}

/// Framework subscribe markers carry no payload-type argument; the payload
/// is the annotated handler method's first parameter type.
fn extract_framework_marker(
    project: &Project,
    unit: &SourceUnit,
    site: &MarkerSite,
    synthesizer: &SchemaSynthesizer,
) -> Result<Option<ContractRecord>, ScanError> {
    let args = marker_arguments(site)?;
    let Some(name) = text_arg(&args, FRAMEWORK_NAME_PARAM).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    let schema = site
        .handler_param_type
        .as_ref()
        .map(|ty| synthesizer.synthesize(ty));
    Ok(Some(ContractRecord {
        name,
        schema,
        description: None,
        module: None,
        assembly: project.assembly.clone(),
        location: site_location(unit, site.line),
        direction: Direction::Subscribe,
    }))
}

/// The payload argument of a publish call is located by parameter name in
/// the resolved signature; its *static expression type* (not the evaluated
/// value) feeds the synthesizer.
fn extract_call(
    project: &Project,
    unit: &SourceUnit,
    site: &CallSite,
    synthesizer: &SchemaSynthesizer,
) -> Option<ContractRecord> {
    let name_index = site.params.iter().position(|p| p == FRAMEWORK_NAME_PARAM)?;
    let name = site
        .args
        .get(name_index)
        .and_then(evaluate_expression)
        .and_then(ArgValue::into_text)
        .filter(|n| !n.is_empty())?;
    let schema = site
        .params
        .iter()
        .position(|p| p == FRAMEWORK_PAYLOAD_PARAM)
        .and_then(|index| site.arg_types.get(index))
        .and_then(|ty| ty.as_ref())
        .map(|ty| synthesizer.synthesize(ty));
    Some(ContractRecord {
        name,
        schema,
        description: None,
        module: None,
        assembly: project.assembly.clone(),
        location: site_location(unit, site.line),
        direction: Direction::Publish,
    })
}

/// Zips the marker's constructor parameter names with the evaluated
/// argument values, positionally. Missing trailing arguments map to absent;
/// extra arguments beyond the declared parameters are ignored.
fn marker_arguments<'a>(
    site: &'a MarkerSite,
) -> Result<IndexMap<&'a str, Option<ArgValue<'a>>>, ScanError> {
    let params = site
        .marker
        .ctor_params
        .as_ref()
        .ok_or_else(|| ScanError::MarkerShape {
            marker: site.marker.name.clone(),
        })?;
    Ok(params
        .iter()
        .enumerate()
        .map(|(i, param)| {
            (
                param.as_str(),
                site.args.get(i).and_then(evaluate_expression),
            )
        })
        .collect())
}

fn text_arg(args: &IndexMap<&str, Option<ArgValue<'_>>>, param: &str) -> Option<String> {
    args.get(param)?.clone().and_then(ArgValue::into_text)
}

fn type_arg<'a>(
    args: &IndexMap<&str, Option<ArgValue<'a>>>,
    param: &str,
) -> Option<&'a TypeDescriptor> {
    args.get(param)?.as_ref().and_then(ArgValue::as_type)
}

fn site_location(unit: &SourceUnit, line: u32) -> String {
    format!("{}:{}", unit.path, line)
}

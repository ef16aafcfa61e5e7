//! The workspace snapshot: msgmap's interface to the host compiler.
//!
//! The host frontend walks its own syntax and symbol tables and exports the
//! candidate material as JSON: one [`Workspace`] of projects, each project
//! one compilation with its source units, each unit the marker applications
//! and call expressions found in it, in document order. Types arrive as
//! [`TypeDescriptor`] trees and argument expressions as pre-resolved
//! [`Expr`] shapes, so scanning never calls back into the host.
//!
//! Unknown constructs simply do not appear in a snapshot (or appear as
//! [`Expr::Other`]); a snapshot is a filtered view, not a full syntax tree.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use msgmap_core::TypeDescriptor;

use crate::error::ScanError;

/// A host workspace export: the root of one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub name: String,
    pub projects: Vec<Project>,
}

impl Workspace {
    /// Reads and parses a snapshot file.
    pub fn load(path: &Path) -> Result<Workspace, ScanError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// One compilation: an assembly identity plus its source units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Compilation/unit identity recorded on every extracted contract.
    pub assembly: String,
    /// Opaque identity of this compilation run, supplied by the host.
    /// Drives server-side supersession on the live reporting path.
    #[serde(default)]
    pub compilation_id: Option<String>,
    pub units: Vec<SourceUnit>,
}

/// One source file with its candidate declaration sites, document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceUnit {
    pub path: String,
    #[serde(default)]
    pub markers: Vec<MarkerSite>,
    #[serde(default)]
    pub calls: Vec<CallSite>,
}

/// An attribute/marker application site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerSite {
    /// Zero-based line of the marker application.
    pub line: u32,
    pub marker: MarkerType,
    /// Argument expressions in source order.
    #[serde(default)]
    pub args: Vec<Expr>,
    /// First parameter type of the annotated handler method, when the
    /// marker sits on a method. Framework subscribe markers carry their
    /// payload type here.
    #[serde(default)]
    pub handler_param_type: Option<TypeDescriptor>,
}

/// The resolved type of an applied marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerType {
    /// Simple type name, e.g. `PublishesAttribute`.
    pub name: String,
    /// Fully qualified display string.
    pub display: String,
    /// Fully qualified display of the marker's base type, when resolved.
    #[serde(default)]
    pub base_display: Option<String>,
    /// Constructor parameter names in declaration order. `None` when the
    /// host found no constructor -- a hard extraction failure.
    #[serde(default)]
    pub ctor_params: Option<Vec<String>>,
}

/// A call-expression site with its resolved callee signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSite {
    /// Zero-based line of the call expression.
    pub line: u32,
    /// Invoked member name, e.g. `PublishAsync`.
    pub member_name: String,
    /// Display string of the receiver expression's static type.
    pub receiver_display: String,
    /// Parameter names of the resolved callee signature, declaration order.
    #[serde(default)]
    pub params: Vec<String>,
    /// Argument expressions in source order.
    #[serde(default)]
    pub args: Vec<Expr>,
    /// Static type of each argument expression, parallel to `args`.
    #[serde(default)]
    pub arg_types: Vec<Option<TypeDescriptor>>,
}

/// A constant value the host resolved at a declaration site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstValue::Str(s) => write!(f, "{}", s),
            ConstValue::Int(i) => write!(f, "{}", i),
            ConstValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// An argument expression, pre-resolved by the host.
///
/// These are the only shapes argument evaluation accepts; anything else the
/// host saw is exported as [`Expr::Other`] and evaluates to absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expr {
    /// A literal constant.
    Literal { value: ConstValue },
    /// A reference to a symbolic constant, with its resolved value when the
    /// host could evaluate it.
    ConstRef {
        name: String,
        #[serde(default)]
        value: Option<ConstValue>,
    },
    /// A type-of expression; resolves to a type rather than a value.
    TypeOf { ty: TypeDescriptor },
    /// A name-extraction call; resolves to the operand's source text.
    NameOf { operand: String },
    /// Any expression shape the host does not export structurally.
    Other,
}

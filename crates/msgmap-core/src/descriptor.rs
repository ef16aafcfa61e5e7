//! Type descriptors: the engine's view of the host type system.
//!
//! A [`TypeDescriptor`] is a resolved snapshot of one type, produced by a
//! host frontend and consumed by the schema synthesizer. The [`TypeKind`]
//! discriminator is closed and matched exhaustively; per-kind data (element
//! types, properties, enum members, the base-type chain) hangs off the
//! descriptor itself, so descriptors form a finite tree the synthesizer can
//! walk without calling back into the host.

use serde::{Deserialize, Serialize};

/// Kind discriminator for a [`TypeDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeKind {
    /// Scalar or otherwise opaque type, rendered by display name.
    Primitive,
    /// Class/record type with readable instance properties.
    Class,
    /// Enum with constant-valued members.
    Enum,
    /// Raw array; the element type is in [`TypeDescriptor::element`].
    Array,
    /// Nullable wrapper; the underlying type is the first type argument.
    Nullable,
    /// The host's dynamic/unknown-type marker.
    Dynamic,
}

/// A resolved type as exported by the host frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Simple type name, e.g. `List` (drives the collection-name heuristic).
    pub name: String,
    /// Full display string, e.g. `System.Collections.Generic.List<int>`.
    /// Emitted verbatim for primitives and enums.
    pub display: String,
    pub kind: TypeKind,
    /// Generic arguments. A nullable wrapper carries its underlying type
    /// here; generic collections carry their element type first.
    #[serde(default)]
    pub type_args: Vec<TypeDescriptor>,
    /// Element type of a raw array.
    #[serde(default)]
    pub element: Option<Box<TypeDescriptor>>,
    /// Instance properties declared by this type itself (base types excluded).
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
    /// Base type, if any. Base properties render after the declaring type's.
    #[serde(default)]
    pub base: Option<Box<TypeDescriptor>>,
    /// Enum members as (constant value, member name) pairs, declaration order.
    #[serde(default)]
    pub members: Vec<EnumMember>,
    /// Documentation summary for the type, when the host surfaced one.
    #[serde(default)]
    pub summary: Option<String>,
}

/// One readable property of a class-kind descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    /// Property type; `None` when the host could not resolve it.
    #[serde(default)]
    pub ty: Option<TypeDescriptor>,
    /// Documentation summary, when the host surfaced one.
    #[serde(default)]
    pub summary: Option<String>,
    /// Whether the property has a readable accessor.
    #[serde(default = "default_true")]
    pub readable: bool,
    /// Static properties are excluded from schemas.
    #[serde(default)]
    pub is_static: bool,
}

/// One constant-valued enum member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumMember {
    pub value: i64,
    pub name: String,
}

fn default_true() -> bool {
    true
}

impl TypeDescriptor {
    /// A primitive rendered by its display name.
    pub fn primitive(display: &str) -> Self {
        TypeDescriptor {
            name: display.to_string(),
            display: display.to_string(),
            kind: TypeKind::Primitive,
            type_args: Vec::new(),
            element: None,
            properties: Vec::new(),
            base: None,
            members: Vec::new(),
            summary: None,
        }
    }

    /// The host's dynamic/unknown-type marker.
    pub fn dynamic() -> Self {
        TypeDescriptor {
            kind: TypeKind::Dynamic,
            ..Self::primitive("dynamic")
        }
    }

    /// A class with the given declared properties.
    pub fn class(name: &str, properties: Vec<PropertyDescriptor>) -> Self {
        TypeDescriptor {
            kind: TypeKind::Class,
            properties,
            ..Self::primitive(name)
        }
    }

    /// A raw array over `element`.
    pub fn array_of(element: TypeDescriptor) -> Self {
        TypeDescriptor {
            name: format!("{}[]", element.name),
            display: format!("{}[]", element.display),
            kind: TypeKind::Array,
            element: Some(Box::new(element)),
            ..Self::primitive("")
        }
    }

    /// A generic named type, e.g. `List<int>`.
    pub fn generic(name: &str, display: &str, type_args: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor {
            name: name.to_string(),
            display: display.to_string(),
            kind: TypeKind::Class,
            type_args,
            ..Self::primitive("")
        }
    }

    /// An enum with constant-valued members in declaration order.
    pub fn enumeration(display: &str, members: Vec<(i64, &str)>) -> Self {
        TypeDescriptor {
            kind: TypeKind::Enum,
            members: members
                .into_iter()
                .map(|(value, name)| EnumMember {
                    value,
                    name: name.to_string(),
                })
                .collect(),
            ..Self::primitive(display)
        }
    }

    /// A nullable wrapper over `underlying`.
    pub fn nullable(underlying: TypeDescriptor) -> Self {
        TypeDescriptor {
            name: "Nullable".to_string(),
            display: format!("{}?", underlying.display),
            kind: TypeKind::Nullable,
            type_args: vec![underlying],
            ..Self::primitive("")
        }
    }

    /// Attaches a base type.
    pub fn with_base(mut self, base: TypeDescriptor) -> Self {
        self.base = Some(Box::new(base));
        self
    }

    /// Attaches a documentation summary.
    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }
}

impl PropertyDescriptor {
    /// A readable instance property of the given type.
    pub fn new(name: &str, ty: TypeDescriptor) -> Self {
        PropertyDescriptor {
            name: name.to_string(),
            ty: Some(ty),
            summary: None,
            readable: true,
            is_static: false,
        }
    }

    /// A property whose type the host failed to resolve.
    pub fn unresolved(name: &str) -> Self {
        PropertyDescriptor {
            name: name.to_string(),
            ty: None,
            summary: None,
            readable: true,
            is_static: false,
        }
    }

    /// Attaches a documentation summary.
    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }
}

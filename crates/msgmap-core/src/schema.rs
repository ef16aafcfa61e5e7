//! Schema synthesis: turning a [`TypeDescriptor`] into a canonical textual
//! payload schema.
//!
//! One [`SchemaSynthesizer`] serves both consumers, parameterized by
//! [`SchemaOptions`]: the offline scanner preset enables doc-comment
//! enrichment, alphabetical property ordering, the `dynamic` marker and
//! nullable-enum unwrapping; the live preset disables all four.
//!
//! Dispatch order is fixed: dynamic, then collection, then enum, then class,
//! then primitive -- first match wins. Rendering is line-oriented with an
//! 8-space indent per nesting level. Synthesis never fails: unresolved types
//! degrade to an empty quoted name and missing documentation is simply
//! omitted.

use crate::descriptor::{EnumMember, PropertyDescriptor, TypeDescriptor, TypeKind};

/// Order in which a class's own properties render, per inheritance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyOrdering {
    /// Declaration order, as exported by the host.
    Declared,
    /// Alphabetical by property name (deterministic across host versions).
    Alphabetical,
}

/// Configuration for one synthesizer instance.
#[derive(Debug, Clone)]
pub struct SchemaOptions {
    /// Prepend `/*summary*/` comments from documentation, where present and
    /// not merely restating the property name.
    pub include_doc_comments: bool,
    pub ordering: PropertyOrdering,
    /// Emit the literal `dynamic` marker for dynamic-kind types. When off,
    /// a dynamic type falls through to primitive rendering.
    pub dynamic_marker: bool,
    /// Treat a nullable wrapper over an enum as that enum.
    pub unwrap_nullable_enum: bool,
    /// Alphabetize enum members instead of keeping declaration order.
    pub sort_enum_members: bool,
}

impl SchemaOptions {
    /// Preset used by the offline scanner.
    pub fn scanner() -> Self {
        SchemaOptions {
            include_doc_comments: true,
            ordering: PropertyOrdering::Alphabetical,
            dynamic_marker: true,
            unwrap_nullable_enum: true,
            sort_enum_members: false,
        }
    }

    /// Preset used by the live analyzer.
    pub fn live() -> Self {
        SchemaOptions {
            include_doc_comments: false,
            ordering: PropertyOrdering::Declared,
            dynamic_marker: false,
            unwrap_nullable_enum: false,
            sort_enum_members: false,
        }
    }
}

/// Spaces per nesting level.
const INDENT: i32 = 8;

/// Hard recursion cap; a class nested deeper renders as its display name.
const MAX_DEPTH: i32 = 32;

/// Name fragments identifying generic collection types.
const COLLECTION_NAME_FRAGMENTS: [&str; 4] = ["List", "Array", "Enumerable", "Collection"];

/// Synthesizes textual payload schemas from type descriptors.
pub struct SchemaSynthesizer {
    options: SchemaOptions,
}

impl SchemaSynthesizer {
    pub fn new(options: SchemaOptions) -> Self {
        SchemaSynthesizer { options }
    }

    /// Renders the schema for a payload root type.
    ///
    /// A collection root renders directly (its element object starts at
    /// column 0); any other non-dynamic root renders through the class path,
    /// which yields `{\n}` for types without readable properties.
    pub fn synthesize(&self, root: &TypeDescriptor) -> String {
        let mut out = String::new();
        let mut expanding = Vec::new();
        if self.options.dynamic_marker && root.kind == TypeKind::Dynamic {
            out.push_str("dynamic");
        } else if is_collection(root) {
            self.collection_schema(root, &mut out, -1, &mut expanding);
        } else {
            self.class_schema(root, &mut out, 0, &mut expanding);
        }
        out
    }

    /// Dispatches one property/element branch. `None` descriptors render as
    /// an empty quoted name; nothing here ever fails.
    fn branch_schema(
        &self,
        ty: Option<&TypeDescriptor>,
        out: &mut String,
        level: i32,
        expanding: &mut Vec<String>,
    ) {
        let Some(ty) = ty else {
            out.push_str("\"\"");
            return;
        };
        if self.options.dynamic_marker && ty.kind == TypeKind::Dynamic {
            out.push_str("dynamic");
        } else if is_collection(ty) {
            self.collection_schema(ty, out, level, expanding);
        } else if self.is_enum(ty) {
            self.enum_schema(ty, out);
        } else if is_class(ty) {
            // Cycle guard: a type already being expanded (or one past the
            // depth cap) renders as its display name instead of recursing.
            if level + 1 >= MAX_DEPTH || expanding.iter().any(|d| d == &ty.display) {
                primitive_schema(ty, out);
            } else {
                self.class_schema(ty, out, level + 1, expanding);
            }
        } else {
            primitive_schema(ty, out);
        }
    }

    /// Brace-delimited object: one line per readable instance property, the
    /// declaring type's properties first, then each base type's.
    fn class_schema(
        &self,
        ty: &TypeDescriptor,
        out: &mut String,
        level: i32,
        expanding: &mut Vec<String>,
    ) {
        out.push('{');
        if self.options.include_doc_comments {
            if let Some(summary) = ty.summary.as_deref().filter(|s| !s.is_empty()) {
                out.push_str(&format!("/*{}*/", summary));
            }
        }
        out.push('\n');

        expanding.push(ty.display.clone());
        let properties = collect_properties(ty, self.options.ordering);
        for (i, property) in properties.iter().enumerate() {
            if self.options.include_doc_comments {
                if let Some(summary) = property.summary.as_deref().filter(|s| !s.is_empty()) {
                    if summary_differs(summary, &property.name) {
                        push_indent(out, level + 1);
                        out.push_str(&format!("/*{}*/", summary));
                        out.push('\n');
                    }
                }
            }

            push_indent(out, level + 1);
            out.push_str(&format!("\"{}\": ", property.name));
            self.branch_schema(property.ty.as_ref(), out, level, expanding);
            if i < properties.len() - 1 {
                out.push(',');
            }
            out.push('\n');
        }
        expanding.pop();

        push_indent(out, level.max(0));
        out.push('}');
    }

    fn collection_schema(
        &self,
        ty: &TypeDescriptor,
        out: &mut String,
        level: i32,
        expanding: &mut Vec<String>,
    ) {
        out.push('[');
        self.branch_schema(element_of(ty), out, level, expanding);
        out.push(']');
    }

    /// Quoted display name followed by an inline member listing.
    ///
    /// The separator loop intentionally stops one member early, so the last
    /// two members run together without a comma -- downstream consumers
    /// parse this exact form.
    fn enum_schema(&self, ty: &TypeDescriptor, out: &mut String) {
        out.push_str(&format!("\"{}\"", ty.display));
        out.push_str("/*[");
        let source = if ty.kind == TypeKind::Nullable {
            ty.type_args.first().unwrap_or(ty)
        } else {
            ty
        };
        let mut members: Vec<&EnumMember> = source.members.iter().collect();
        if self.options.sort_enum_members {
            members.sort_by(|a, b| a.name.cmp(&b.name));
        }
        for (i, member) in members.iter().enumerate() {
            out.push_str(&format!("{}-{}", member.value, member.name));
            if i + 2 < members.len() {
                out.push_str(", ");
            }
        }
        out.push_str("]*/");
    }

    fn is_enum(&self, ty: &TypeDescriptor) -> bool {
        ty.kind == TypeKind::Enum
            || (self.options.unwrap_nullable_enum
                && ty.kind == TypeKind::Nullable
                && ty.type_args.first().is_some_and(|t| t.kind == TypeKind::Enum))
    }
}

fn primitive_schema(ty: &TypeDescriptor, out: &mut String) {
    out.push_str(&format!("\"{}\"", ty.display));
}

fn push_indent(out: &mut String, level: i32) {
    for _ in 0..(level * INDENT).max(0) {
        out.push(' ');
    }
}

/// A raw array, or a generic type whose simple name contains a known
/// collection fragment. Name-substring heuristic, not a structural check.
fn is_collection(ty: &TypeDescriptor) -> bool {
    ty.kind == TypeKind::Array
        || (!ty.type_args.is_empty()
            && COLLECTION_NAME_FRAGMENTS
                .iter()
                .any(|fragment| ty.name.contains(fragment)))
}

fn element_of(ty: &TypeDescriptor) -> Option<&TypeDescriptor> {
    if ty.kind == TypeKind::Array {
        ty.element.as_deref()
    } else {
        ty.type_args.first()
    }
}

/// Class-kind, except the host's string type (rendered as a primitive).
fn is_class(ty: &TypeDescriptor) -> bool {
    ty.kind == TypeKind::Class && ty.display != "string" && ty.display != "string?"
}

/// Readable, non-static, name-addressable properties: the declaring type's
/// own first (ordered per `ordering` within each level), then each base
/// type's, walking up the chain.
fn collect_properties(ty: &TypeDescriptor, ordering: PropertyOrdering) -> Vec<&PropertyDescriptor> {
    let mut own: Vec<&PropertyDescriptor> = ty
        .properties
        .iter()
        .filter(|p| p.readable && !p.is_static && !p.name.is_empty())
        .collect();
    if ordering == PropertyOrdering::Alphabetical {
        own.sort_by(|a, b| a.name.cmp(&b.name));
    }
    if let Some(base) = ty.base.as_deref() {
        own.extend(collect_properties(base, ordering));
    }
    own
}

/// A property summary that merely restates the property name (ignoring
/// case, spaces in the summary and underscores in the name) is noise and is
/// suppressed.
fn summary_differs(summary: &str, property_name: &str) -> bool {
    let normalized_summary: String = summary
        .chars()
        .filter(|c| *c != ' ')
        .collect::<String>()
        .to_lowercase();
    let normalized_name = property_name.replace('_', "").to_lowercase();
    normalized_summary != normalized_name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PropertyDescriptor as Prop;

    fn scanner() -> SchemaSynthesizer {
        SchemaSynthesizer::new(SchemaOptions::scanner())
    }

    fn live() -> SchemaSynthesizer {
        SchemaSynthesizer::new(SchemaOptions::live())
    }

    fn int() -> TypeDescriptor {
        TypeDescriptor::primitive("int")
    }

    fn string() -> TypeDescriptor {
        TypeDescriptor::primitive("string")
    }

    #[test]
    fn flat_class_renders_eight_space_indent_no_trailing_comma() {
        let ty = TypeDescriptor::class(
            "OrderCreated",
            vec![Prop::new("Id", int()), Prop::new("Name", string())],
        );
        let schema = live().synthesize(&ty);
        assert_eq!(schema, "{\n        \"Id\": \"int\",\n        \"Name\": \"string\"\n}");
    }

    #[test]
    fn entry_count_matches_property_count() {
        let props: Vec<Prop> = (0..7).map(|i| Prop::new(&format!("P{}", i), int())).collect();
        let schema = live().synthesize(&TypeDescriptor::class("Wide", props));
        assert_eq!(schema.matches(',').count(), 6);
        assert_eq!(schema.lines().count(), 9); // brace + 7 properties + brace
        assert!(!schema.contains(",\n}"));
    }

    #[test]
    fn nested_class_indents_one_more_level() {
        let inner = TypeDescriptor::class("Inner", vec![Prop::new("Value", int())]);
        let outer = TypeDescriptor::class("Outer", vec![Prop::new("Child", inner)]);
        let schema = live().synthesize(&outer);
        insta::assert_snapshot!(schema, @r#"
        {
                "Child": {
                        "Value": "int"
                }
        }
        "#);
    }

    #[test]
    fn collection_root_equals_bracketed_element_schema() {
        let item = TypeDescriptor::class("Item", vec![Prop::new("Id", int())]);
        let direct = live().synthesize(&item);
        let as_array = live().synthesize(&TypeDescriptor::array_of(item));
        assert_eq!(as_array, format!("[{}]", direct));
    }

    #[test]
    fn generic_collection_matched_by_name_fragment() {
        let list = TypeDescriptor::generic("List", "System.Collections.Generic.List<int>", vec![int()]);
        assert_eq!(live().synthesize(&list), "[\"int\"]");

        // Name contains "List" but carries no type arguments: not a collection.
        let listing = TypeDescriptor::class("Listing", vec![Prop::new("Id", int())]);
        assert!(live().synthesize(&listing).starts_with('{'));
    }

    #[test]
    fn collection_property_renders_inline() {
        let list = TypeDescriptor::generic("IEnumerable", "IEnumerable<string>", vec![string()]);
        let ty = TypeDescriptor::class("Batch", vec![Prop::new("Names", list)]);
        assert_eq!(
            live().synthesize(&ty),
            "{\n        \"Names\": [\"string\"]\n}"
        );
    }

    #[test]
    fn enum_member_listing_drops_last_separator() {
        let color = TypeDescriptor::enumeration("Color", vec![(0, "A"), (1, "B"), (2, "C")]);
        let ty = TypeDescriptor::class("Palette", vec![Prop::new("Main", color)]);
        let schema = live().synthesize(&ty);
        assert!(schema.contains("\"Color\"/*[0-A, 1-B2-C]*/"), "got: {}", schema);
    }

    #[test]
    fn enum_members_can_be_alphabetized() {
        let mut options = SchemaOptions::scanner();
        options.sort_enum_members = true;
        let synthesizer = SchemaSynthesizer::new(options);

        let level = TypeDescriptor::enumeration("Level", vec![(2, "Zeta"), (0, "Alpha"), (1, "Mid")]);
        let ty = TypeDescriptor::class("T", vec![Prop::new("L", level)]);
        let schema = synthesizer.synthesize(&ty);
        assert!(schema.contains("\"Level\"/*[0-Alpha, 1-Mid2-Zeta]*/"), "got: {}", schema);
    }

    #[test]
    fn single_and_two_member_enums_render_without_separator() {
        let one = TypeDescriptor::enumeration("One", vec![(0, "Only")]);
        let ty = TypeDescriptor::class("H", vec![Prop::new("V", one)]);
        assert!(live().synthesize(&ty).contains("\"One\"/*[0-Only]*/"));

        let two = TypeDescriptor::enumeration("Two", vec![(0, "A"), (1, "B")]);
        let ty = TypeDescriptor::class("H", vec![Prop::new("V", two)]);
        assert!(live().synthesize(&ty).contains("\"Two\"/*[0-A1-B]*/"));
    }

    #[test]
    fn nullable_enum_unwraps_only_when_enabled() {
        let status = TypeDescriptor::enumeration("Status", vec![(0, "Open"), (1, "Closed")]);
        let ty = TypeDescriptor::class(
            "Ticket",
            vec![Prop::new("State", TypeDescriptor::nullable(status))],
        );

        // Scanner preset unwraps: enum rendering with the nullable display.
        let schema = scanner().synthesize(&ty);
        assert!(schema.contains("\"Status?\"/*[0-Open1-Closed]*/"), "got: {}", schema);

        // Live preset does not: the wrapper falls through to primitive.
        let schema = live().synthesize(&ty);
        assert!(schema.contains("\"State\": \"Status?\""), "got: {}", schema);
        assert!(!schema.contains("/*["));
    }

    #[test]
    fn dynamic_marker_gated_by_options() {
        let ty = TypeDescriptor::class("Envelope", vec![Prop::new("Body", TypeDescriptor::dynamic())]);
        assert!(scanner().synthesize(&ty).contains("\"Body\": dynamic"));
        assert!(live().synthesize(&ty).contains("\"Body\": \"dynamic\""));

        assert_eq!(scanner().synthesize(&TypeDescriptor::dynamic()), "dynamic");
    }

    #[test]
    fn base_type_properties_append_after_own() {
        let base = TypeDescriptor::class("EntityBase", vec![Prop::new("Id", int())]);
        let ty = TypeDescriptor::class("Order", vec![Prop::new("Total", int())]).with_base(base);
        let schema = live().synthesize(&ty);
        let total = schema.find("\"Total\"").unwrap();
        let id = schema.find("\"Id\"").unwrap();
        assert!(total < id, "own properties must precede base properties: {}", schema);
    }

    #[test]
    fn alphabetical_ordering_sorts_within_each_level() {
        let base = TypeDescriptor::class(
            "Base",
            vec![Prop::new("Zeta", int()), Prop::new("Alpha", int())],
        );
        let ty = TypeDescriptor::class(
            "Derived",
            vec![Prop::new("Mu", int()), Prop::new("Beta", int())],
        )
        .with_base(base);
        let schema = scanner().synthesize(&ty);
        let order: Vec<usize> = ["\"Beta\"", "\"Mu\"", "\"Alpha\"", "\"Zeta\""]
            .iter()
            .map(|n| schema.find(*n).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]), "got: {}", schema);
    }

    #[test]
    fn static_and_writeonly_properties_are_skipped() {
        let mut counter = Prop::new("Counter", int());
        counter.is_static = true;
        let mut sink = Prop::new("Sink", int());
        sink.readable = false;
        let ty = TypeDescriptor::class("T", vec![counter, sink, Prop::new("Kept", int())]);
        let schema = live().synthesize(&ty);
        assert_eq!(schema, "{\n        \"Kept\": \"int\"\n}");
    }

    #[test]
    fn unresolved_property_type_renders_empty_name() {
        let ty = TypeDescriptor::class("T", vec![Prop::unresolved("Mystery")]);
        assert_eq!(live().synthesize(&ty), "{\n        \"Mystery\": \"\"\n}");
    }

    #[test]
    fn string_class_kind_renders_as_primitive() {
        let host_string = TypeDescriptor {
            kind: TypeKind::Class,
            ..TypeDescriptor::primitive("string")
        };
        let ty = TypeDescriptor::class("T", vec![Prop::new("Name", host_string)]);
        assert!(live().synthesize(&ty).contains("\"Name\": \"string\""));
    }

    #[test]
    fn root_without_properties_renders_empty_object() {
        // Enum and primitive roots go through the class path.
        let color = TypeDescriptor::enumeration("Color", vec![(0, "Red")]);
        assert_eq!(live().synthesize(&color), "{\n}");
        assert_eq!(live().synthesize(&int()), "{\n}");
    }

    #[test]
    fn self_referential_display_renders_as_name_instead_of_recursing() {
        // Node -> Parent: Node. The nested descriptor reuses the display of
        // the one being expanded, so the guard cuts it off.
        let nested = TypeDescriptor::class("Node", vec![]);
        let ty = TypeDescriptor::class("Node", vec![Prop::new("Parent", nested)]);
        let schema = live().synthesize(&ty);
        assert_eq!(schema, "{\n        \"Parent\": \"Node\"\n}");
    }

    #[test]
    fn type_summary_rides_on_opening_brace() {
        let inner = TypeDescriptor::class("Inner", vec![Prop::new("V", int())])
            .with_summary("The payload body");
        let ty = TypeDescriptor::class("Outer", vec![Prop::new("Body", inner)]);
        let schema = scanner().synthesize(&ty);
        assert!(schema.contains("\"Body\": {/*The payload body*/\n"), "got: {}", schema);
        assert!(!live().synthesize(&ty).contains("/*"));
    }

    #[test]
    fn property_summary_rendered_on_own_line_unless_it_restates_the_name() {
        let ty = TypeDescriptor::class(
            "Order",
            vec![
                Prop::new("Total", int()).with_summary("Gross total in cents"),
                Prop::new("Created_At", int()).with_summary("Created At"),
            ],
        );
        let schema = scanner().synthesize(&ty);
        assert!(
            schema.contains("        /*Gross total in cents*/\n        \"Total\""),
            "got: {}",
            schema
        );
        // "Created At" normalizes to "createdat" == "Created_At" minus
        // underscores: suppressed.
        assert!(!schema.contains("/*Created At*/"), "got: {}", schema);
    }
}

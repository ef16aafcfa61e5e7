//! Catalog merging: reducing many contract observations into one
//! deduplicated, deterministically ordered catalog.
//!
//! Identity is the 4-tuple `(name, assembly, direction, primary file of the
//! location)`. Within a group each scalar field resolves independently:
//! longest non-absent string wins, ties going to the first record
//! encountered. Locations are never reduced; every contributing site is
//! kept, newline-joined.

use indexmap::IndexMap;

use crate::contract::{CatalogEntry, ContractRecord, Direction};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    name: String,
    assembly: String,
    direction: Direction,
    file: String,
}

/// Merges contract records into the final catalog.
///
/// Records with an empty name are discarded. Output is sorted by message
/// name ascending; groups with equal names keep first-encounter order.
/// Deterministic for a given input sequence, and idempotent: merging a
/// merged catalog (re-expressed as records) changes nothing.
pub fn merge(records: impl IntoIterator<Item = ContractRecord>) -> Vec<CatalogEntry> {
    let mut groups: IndexMap<GroupKey, Vec<ContractRecord>> = IndexMap::new();
    for record in records {
        if record.name.is_empty() {
            continue;
        }
        let key = GroupKey {
            name: record.name.clone(),
            assembly: record.assembly.clone(),
            direction: record.direction,
            file: primary_file(&record.location).to_string(),
        };
        groups.entry(key).or_default().push(record);
    }

    let mut entries: Vec<CatalogEntry> = groups
        .into_iter()
        .map(|(key, members)| reduce_group(key, &members))
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}

/// The location text up to the first `:` -- the file-path component of a
/// `path:line` location (and of a merged multi-line location, whose first
/// line leads with the same path).
fn primary_file(location: &str) -> &str {
    location.split(':').next().unwrap_or_default()
}

fn reduce_group(key: GroupKey, members: &[ContractRecord]) -> CatalogEntry {
    CatalogEntry {
        name: key.name,
        schema: longest(members.iter().map(|m| m.schema.as_deref())),
        description: longest(members.iter().map(|m| m.description.as_deref())),
        module: longest(members.iter().map(|m| m.module.as_deref())),
        assembly: key.assembly,
        location: members
            .iter()
            .map(|m| m.location.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        direction: key.direction,
    }
}

/// Longest present value; ties broken by first encountered.
fn longest<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Option<String> {
    let mut winner: Option<&str> = None;
    for value in values.flatten() {
        match winner {
            Some(current) if value.len() <= current.len() => {}
            _ => winner = Some(value),
        }
    }
    winner.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(name: &str, module: Option<&str>, location: &str) -> ContractRecord {
        ContractRecord {
            name: name.to_string(),
            schema: None,
            description: None,
            module: module.map(str::to_string),
            assembly: "App".to_string(),
            location: location.to_string(),
            direction: Direction::Publish,
        }
    }

    #[test]
    fn longest_module_wins() {
        let merged = merge(vec![
            record("OrderCreated", Some("A"), "a.cs:1"),
            record("OrderCreated", Some("Accounting"), "a.cs:9"),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].module.as_deref(), Some("Accounting"));
    }

    #[test]
    fn length_ties_keep_first_encountered() {
        let merged = merge(vec![
            record("M", Some("Abc"), "a.cs:1"),
            record("M", Some("Xyz"), "a.cs:2"),
        ]);
        assert_eq!(merged[0].module.as_deref(), Some("Abc"));
    }

    #[test]
    fn absent_fields_lose_to_any_present_value() {
        let merged = merge(vec![
            record("M", None, "a.cs:1"),
            record("M", Some("Sales"), "a.cs:2"),
        ]);
        assert_eq!(merged[0].module.as_deref(), Some("Sales"));

        let merged = merge(vec![record("M", None, "a.cs:1")]);
        assert_eq!(merged[0].module, None);
    }

    #[test]
    fn empty_names_are_discarded() {
        let merged = merge(vec![record("", Some("X"), "a.cs:1"), record("M", None, "a.cs:2")]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "M");
    }

    #[test]
    fn locations_join_with_newlines() {
        let merged = merge(vec![
            record("M", None, "src/a.cs:3"),
            record("M", None, "src/a.cs:17"),
        ]);
        assert_eq!(merged[0].location, "src/a.cs:3\nsrc/a.cs:17");
    }

    #[test]
    fn differing_files_split_groups() {
        let merged = merge(vec![
            record("M", None, "src/a.cs:1"),
            record("M", None, "src/b.cs:1"),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn differing_direction_splits_groups() {
        let mut publish = record("M", None, "a.cs:1");
        publish.direction = Direction::Publish;
        let mut subscribe = record("M", None, "a.cs:2");
        subscribe.direction = Direction::Subscribe;
        let merged = merge(vec![publish, subscribe]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn output_sorted_by_name() {
        let merged = merge(vec![
            record("Zebra", None, "a.cs:1"),
            record("Apple", None, "b.cs:1"),
            record("Mango", None, "c.cs:1"),
        ]);
        let names: Vec<&str> = merged.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "Mango", "Zebra"]);
    }

    #[test]
    fn merge_is_idempotent() {
        let records = vec![
            record("B", Some("Mod"), "x.cs:1"),
            record("B", Some("Module"), "x.cs:2"),
            record("A", None, "y.cs:5"),
        ];
        let once = merge(records);
        let twice = merge(once.clone().into_iter().map(ContractRecord::from));
        assert_eq!(once, twice);
    }

    fn arb_record() -> impl Strategy<Value = ContractRecord> {
        (
            prop::sample::select(vec!["", "A", "B", "OrderCreated"]),
            prop::option::of(prop::sample::select(vec!["m", "mod", "module"])),
            prop::sample::select(vec!["a.cs", "b.cs"]),
            0u32..50,
            prop::bool::ANY,
        )
            .prop_map(|(name, module, file, line, publish)| ContractRecord {
                name: name.to_string(),
                schema: None,
                description: None,
                module: module.map(str::to_string),
                assembly: "App".to_string(),
                location: format!("{}:{}", file, line),
                direction: if publish {
                    Direction::Publish
                } else {
                    Direction::Subscribe
                },
            })
    }

    proptest! {
        #[test]
        fn merge_always_idempotent(records in prop::collection::vec(arb_record(), 0..12)) {
            let once = merge(records);
            let twice = merge(once.clone().into_iter().map(ContractRecord::from));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn merged_keys_are_unique(records in prop::collection::vec(arb_record(), 0..12)) {
            let merged = merge(records);
            let keys: std::collections::HashSet<(String, Direction, String)> = merged
                .iter()
                .map(|e| (
                    e.name.clone(),
                    e.direction,
                    e.location.split(':').next().unwrap_or_default().to_string(),
                ))
                .collect();
            prop_assert_eq!(keys.len(), merged.len());
        }
    }
}

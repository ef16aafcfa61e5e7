pub mod contract;
pub mod descriptor;
pub mod merge;
pub mod schema;

// Re-export commonly used types
pub use contract::{CatalogEntry, ContractRecord, Direction};
pub use descriptor::{EnumMember, PropertyDescriptor, TypeDescriptor, TypeKind};
pub use merge::merge;
pub use schema::{PropertyOrdering, SchemaOptions, SchemaSynthesizer};

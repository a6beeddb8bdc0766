//! Identifier generation for newly created bookmarks.

use uuid::Uuid;

/// Produces opaque identifiers for new records.
///
/// Handlers take this as a trait object so tests can hand out predictable ids.
pub trait IdGenerator: Send + Sync {
    fn generate_id(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

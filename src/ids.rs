//! Cluster identifier generation.

use uuid::Uuid;

/// Produces unique cluster identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Time-ordered UUID v7 identifiers; later ids sort after earlier ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct SortableIdGenerator;

impl IdGenerator for SortableIdGenerator {
    fn generate(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

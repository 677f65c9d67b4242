//! A section or segment that physically holds data, e.g. notes.
use super::Offset;

/// Read-only view of the part of the file a section or segment occupies. Sections
/// have names, segments report an empty name.
pub trait Region {
    /// Offset of the first byte in the file.
    fn offset(&self) -> Offset;

    /// Number of bytes the region occupies in the file (zero for NoBits sections).
    fn size_in_file(&self) -> u64;

    fn name(&self) -> &str;
}

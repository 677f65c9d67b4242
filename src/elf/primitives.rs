/// Index into a string table.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct StringIndex(pub u32);

/// An index into a byte within an ELF file.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct Offset(pub u64);

/// The address of a byte once the file has been loaded. Core files use these for the
/// memory of the process that cored.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct VirtualAddr(pub u64);

/// A range of bytes addressed using either offsets into the ELF file or virtual
/// addresses.
#[derive(Copy, Clone, Debug)]
pub struct Bytes<A> {
    pub start: A,
    pub size: u64,
}

impl Bytes<Offset> {
    pub fn from_raw(start: u64, size: u64) -> Self {
        Bytes {
            start: Offset(start),
            size,
        }
    }
}

impl Bytes<VirtualAddr> {
    pub fn from_raw(start: u64, size: u64) -> Self {
        Bytes {
            start: VirtualAddr(start),
            size,
        }
    }
}

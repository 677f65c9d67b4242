use crate::repl::HexdumpLabels;
use crate::utils;
use memmap2::Mmap;
use std::error::Error;
use std::io::Write;

pub struct Reader {
    pub little_endian: bool,
    pub sixty_four_bit: bool,
    bytes: Mmap,
}

impl Reader {
    /// Note that these functions all return a Result because files (especially core
    /// files) are sometimes truncated and we want to continue to work as well as we can
    /// when that happens.
    pub fn new(bytes: Mmap) -> Result<Self, Box<dyn Error>> {
        // see https://en.wikipedia.org/wiki/Executable_and_Linkable_Format
        utils::require(bytes.len() >= 0x34, "file is much too small to be ELF")?;
        utils::require(
            bytes[0] == 0x7f && bytes[1] == 0x45 && bytes[2] == 0x4c && bytes[3] == 0x46,
            "not an ELF file (bad magic)",
        )?;

        let ei_class = bytes[0x04];
        let ei_data = bytes[0x05];
        let ei_version = bytes[0x06];
        utils::require(
            ei_class == 1 || ei_class == 2,
            &format!("bad elf class: {ei_class}"),
        )?;
        utils::require(
            ei_data == 1 || ei_data == 2,
            &format!("bad elf data encoding: {ei_data}"),
        )?;
        utils::require(ei_version == 1, &format!("bad elf version: {ei_version}"))?;

        let reader = Reader {
            bytes,
            sixty_four_bit: ei_class == 2,
            little_endian: ei_data == 1,
        };
        let e_type = reader.read_half(0x10)?;
        utils::require(
            (1..=4).contains(&e_type),
            &format!("bad elf type {e_type}: not relocatable, exe, shared lib, or core"),
        )?;
        Ok(reader)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn slice(&self, offset: usize, size: usize) -> Result<&[u8], Box<dyn Error>> {
        match offset.checked_add(size) {
            Some(end) if end <= self.bytes.len() => Ok(&self.bytes[offset..end]),
            _ => Err(format!("slice {offset:x}+{size:x} out of bounds").into()),
        }
    }

    pub fn read_byte(&self, offset: usize) -> Result<u8, Box<dyn Error>> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or_else(|| format!("couldn't read byte at offset {offset:x}").into())
    }

    pub fn read_half(&self, offset: usize) -> Result<u16, Box<dyn Error>> {
        let slice = self.slice(offset, 2)?;
        if self.little_endian {
            Ok(u16::from_le_bytes(slice.try_into()?))
        } else {
            Ok(u16::from_be_bytes(slice.try_into()?))
        }
    }

    pub fn read_word(&self, offset: usize) -> Result<u32, Box<dyn Error>> {
        let slice = self.slice(offset, 4)?;
        if self.little_endian {
            Ok(u32::from_le_bytes(slice.try_into()?))
        } else {
            Ok(u32::from_be_bytes(slice.try_into()?))
        }
    }

    pub fn read_xword(&self, offset: usize) -> Result<u64, Box<dyn Error>> {
        let slice = self.slice(offset, 8)?;
        if self.little_endian {
            Ok(u64::from_le_bytes(slice.try_into()?))
        } else {
            Ok(u64::from_be_bytes(slice.try_into()?))
        }
    }

    pub fn hex_dump(
        &self,
        out: &mut impl Write,
        offset: usize,
        size: usize,
        labels: HexdumpLabels,
    ) -> Result<(), Box<dyn Error>> {
        // Clamp so that dumping past the end shows what there is.
        let size = size.min(self.len().saturating_sub(offset));
        let bytes = self.slice(offset, size)?;
        utils::hex_dump(out, offset as u64, bytes, labels);
        Ok(())
    }
}

pub struct Stream<'a> {
    pub reader: &'a Reader,
    pub offset: usize,
}

impl<'a> Stream<'a> {
    pub fn new(reader: &'a Reader, offset: usize) -> Self {
        Stream { reader, offset }
    }

    pub fn read_byte(&mut self) -> Result<u8, Box<dyn Error>> {
        let byte = self.reader.read_byte(self.offset)?;
        self.offset += 1;
        Ok(byte)
    }

    pub fn read_half(&mut self) -> Result<u16, Box<dyn Error>> {
        let half = self.reader.read_half(self.offset)?;
        self.offset += 2;
        Ok(half)
    }

    pub fn read_word(&mut self) -> Result<u32, Box<dyn Error>> {
        let word = self.reader.read_word(self.offset)?;
        self.offset += 4;
        Ok(word)
    }

    pub fn read_xword(&mut self) -> Result<u64, Box<dyn Error>> {
        let xword = self.reader.read_xword(self.offset)?;
        self.offset += 8;
        Ok(xword)
    }

    /// Read either a u32 or u64 word depending on whether the file is 64-bit.
    /// But, for sanity, always return the result as 64 bits.
    pub fn read_addr(&mut self) -> Result<u64, Box<dyn Error>> {
        if self.reader.sixty_four_bit {
            self.read_xword()
        } else {
            Ok(self.read_word()? as u64)
        }
    }

    pub fn read_offset(&mut self) -> Result<u64, Box<dyn Error>> {
        self.read_addr()
    }

    pub fn read_bytes(&mut self, size: usize) -> Result<&'a [u8], Box<dyn Error>> {
        let bytes = self.reader.slice(self.offset, size)?;
        self.offset += size;
        Ok(bytes)
    }

    /// Read a null-terminated string.
    pub fn read_string(&mut self) -> Result<String, Box<dyn Error>> {
        let mut bytes = Vec::new();
        loop {
            let byte = self.read_byte()?;
            if byte == 0 {
                break;
            }
            bytes.push(byte);
        }
        // Names in ELF files are almost always ASCII but be lenient about junk.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Skip forward to the next multiple of align (which must be a power of two).
    pub fn align_to(&mut self, align: usize) {
        debug_assert!(align.is_power_of_two());
        self.offset = (self.offset + align - 1) & !(align - 1);
    }
}

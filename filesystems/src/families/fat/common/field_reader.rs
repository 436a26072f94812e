// Bounds-checked little-endian field access over an in-memory image

use byteorder::{ByteOrder, LittleEndian};
use fatimg_core::FatImgError;

/// Read-only view over the whole image. Every access is bounds checked and
/// reports `TruncatedImage` instead of panicking.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    image: &'a [u8],
}

impl<'a> FieldReader<'a> {
    pub fn new(image: &'a [u8]) -> Self {
        Self { image }
    }

    pub fn len(&self) -> u64 {
        self.image.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }

    /// Borrow `len` bytes starting at the absolute `offset`
    pub fn slice(&self, offset: u64, len: u64) -> Result<&'a [u8], FatImgError> {
        let truncated = || FatImgError::TruncatedImage {
            offset,
            len,
            image_len: self.len(),
        };

        let end = offset.checked_add(len).ok_or_else(truncated)?;
        if end > self.len() {
            return Err(truncated());
        }

        // Both bounds are <= image.len(), so they fit in usize
        Ok(&self.image[offset as usize..end as usize])
    }

    /// Unsigned little-endian integer of `width` bytes (1 to 8)
    pub fn uint(&self, offset: u64, width: usize) -> Result<u64, FatImgError> {
        if width == 0 || width > 8 {
            return Err(FatImgError::InvalidInput(format!(
                "Integer field width must be 1-8 bytes, got {}",
                width
            )));
        }
        let bytes = self.slice(offset, width as u64)?;
        Ok(LittleEndian::read_uint(bytes, width))
    }

    pub fn u8(&self, offset: u64) -> Result<u8, FatImgError> {
        Ok(self.slice(offset, 1)?[0])
    }

    pub fn u16(&self, offset: u64) -> Result<u16, FatImgError> {
        Ok(LittleEndian::read_u16(self.slice(offset, 2)?))
    }

    pub fn u32(&self, offset: u64) -> Result<u32, FatImgError> {
        Ok(LittleEndian::read_u32(self.slice(offset, 4)?))
    }

    /// Fixed-width raw field
    pub fn array<const N: usize>(&self, offset: u64) -> Result<[u8; N], FatImgError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.slice(offset, N as u64)?);
        Ok(out)
    }

    /// Cursor that reads consecutive fields starting at `offset`
    pub fn cursor(&self, offset: u64) -> FieldCursor<'a> {
        FieldCursor {
            reader: *self,
            position: offset,
        }
    }
}

/// Sequential reader used by the header and entry decoders. Each read advances
/// the position by the field width, so a layout is expressed purely by the
/// order of the calls.
#[derive(Debug, Clone)]
pub struct FieldCursor<'a> {
    reader: FieldReader<'a>,
    position: u64,
}

impl<'a> FieldCursor<'a> {
    pub fn position(&self) -> u64 {
        self.position
    }

    fn advance(&mut self, width: u64) {
        self.position += width;
    }

    pub fn u8(&mut self) -> Result<u8, FatImgError> {
        let value = self.reader.u8(self.position)?;
        self.advance(1);
        Ok(value)
    }

    pub fn u16(&mut self) -> Result<u16, FatImgError> {
        let value = self.reader.u16(self.position)?;
        self.advance(2);
        Ok(value)
    }

    pub fn u32(&mut self) -> Result<u32, FatImgError> {
        let value = self.reader.u32(self.position)?;
        self.advance(4);
        Ok(value)
    }

    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], FatImgError> {
        let value = self.reader.array::<N>(self.position)?;
        self.advance(N as u64);
        Ok(value)
    }

    pub fn bytes(&mut self, len: u64) -> Result<&'a [u8], FatImgError> {
        let value = self.reader.slice(self.position, len)?;
        self.advance(len);
        Ok(value)
    }
}

/// Strip trailing NUL and space padding from a fixed-width text field
pub fn trim_padding(field: &[u8]) -> &[u8] {
    let end = field
        .iter()
        .rposition(|&b| b != 0x00 && b != b' ')
        .map_or(0, |i| i + 1);
    &field[..end]
}

/// Padded text field as a trimmed string
pub fn field_to_string(field: &[u8]) -> String {
    String::from_utf8_lossy(trim_padding(field)).into_owned()
}

use crate::error::{PackError, Result};

/// One primitive type code of the descriptor grammar.
///
/// Each code has a fixed canonical width; the packed form of a value is its
/// bit pattern in little-endian byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `u`: unsigned 8-bit.
    U8,
    /// `c`: signed 8-bit.
    I8,
    /// `w`: unsigned 16-bit.
    U16,
    /// `s`: signed 16-bit.
    I16,
    /// `i`: signed 32-bit.
    I32,
    /// `f`: 32-bit float.
    F32,
    /// `d`: 64-bit float.
    F64,
}

impl Primitive {
    /// Map a type code to its primitive. `r` (opaque pointer-sized
    /// references) has no canonical byte form and is rejected like any other
    /// unknown code.
    pub fn from_code(code: char) -> Result<Self> {
        match code {
            'u' => Ok(Primitive::U8),
            'c' => Ok(Primitive::I8),
            'w' => Ok(Primitive::U16),
            's' => Ok(Primitive::I16),
            'i' => Ok(Primitive::I32),
            'f' => Ok(Primitive::F32),
            'd' => Ok(Primitive::F64),
            other => Err(PackError::UnsupportedType(other)),
        }
    }

    pub const fn code(self) -> char {
        match self {
            Primitive::U8 => 'u',
            Primitive::I8 => 'c',
            Primitive::U16 => 'w',
            Primitive::I16 => 's',
            Primitive::I32 => 'i',
            Primitive::F32 => 'f',
            Primitive::F64 => 'd',
        }
    }

    /// Width in bytes, both natively and packed.
    #[inline]
    pub const fn width(self) -> usize {
        match self {
            Primitive::U8 | Primitive::I8 => 1,
            Primitive::U16 | Primitive::I16 => 2,
            Primitive::I32 | Primitive::F32 => 4,
            Primitive::F64 => 8,
        }
    }

    /// Convert one host-order value at the start of `src` into its canonical
    /// bytes at the start of `dst`. Both slices must hold at least `width()`
    /// bytes.
    #[inline]
    pub fn pack(self, src: &[u8], dst: &mut [u8]) {
        match self {
            Primitive::U8 | Primitive::I8 => dst[0] = src[0],
            Primitive::U16 | Primitive::I16 => {
                let v = u16::from_ne_bytes([src[0], src[1]]);
                dst[..2].copy_from_slice(&v.to_le_bytes());
            }
            Primitive::I32 => {
                let v = u32::from_ne_bytes([src[0], src[1], src[2], src[3]]);
                dst[..4].copy_from_slice(&v.to_le_bytes());
            }
            Primitive::F32 => {
                let v = f32::from_ne_bytes([src[0], src[1], src[2], src[3]]);
                dst[..4].copy_from_slice(&v.to_bits().to_le_bytes());
            }
            Primitive::F64 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&src[..8]);
                let v = f64::from_ne_bytes(raw);
                dst[..8].copy_from_slice(&v.to_bits().to_le_bytes());
            }
        }
    }
}

/// Placement of one run of identical fields in the native record and in
/// the packed record. Elements of a run are contiguous in both layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldEntry {
    pub primitive: Primitive,
    /// Number of consecutive elements.
    pub count: usize,
    /// Native offset of the first element, aligned to the element width.
    pub offset: usize,
    /// Packed offset of the first element (running sum of widths).
    pub packed_offset: usize,
}

impl FieldEntry {
    /// Width of one element.
    #[inline]
    pub const fn width(&self) -> usize {
        self.primitive.width()
    }

    /// Native and packed offsets of element `index` of the run.
    #[inline]
    pub const fn element(&self, index: usize) -> (usize, usize) {
        let delta = index * self.width();
        (self.offset + delta, self.packed_offset + delta)
    }
}

/// Parsed descriptor: field placements plus native and packed record sizes.
///
/// The field table holds one entry per `(count, code)` token, so its size
/// does not depend on the repeat counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    descriptor: String,
    fields: Vec<FieldEntry>,
    record_size: usize,
    packed_size: usize,
    max_width: usize,
}

impl Layout {
    /// Parse a descriptor such as `"3f2i"` and compute its layout.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let runs = tokenize(descriptor)?;
        if runs.is_empty() {
            return Err(PackError::EmptyDescriptor);
        }

        let too_large = || PackError::RecordTooLarge(descriptor.to_owned());
        let mut fields = Vec::with_capacity(runs.len());
        let mut offset = 0usize;
        let mut packed_offset = 0usize;
        let mut max_width = 1usize;

        for (count, primitive) in runs {
            let width = primitive.width();
            max_width = max_width.max(width);
            let span = count.checked_mul(width).ok_or_else(too_large)?;

            offset = align_up(offset, width).ok_or_else(too_large)?;
            fields.push(FieldEntry {
                primitive,
                count,
                offset,
                packed_offset,
            });
            offset = offset.checked_add(span).ok_or_else(too_large)?;
            packed_offset = packed_offset.checked_add(span).ok_or_else(too_large)?;
        }

        let record_size = align_up(offset, max_width)
            .filter(|&size| size <= isize::MAX as usize)
            .ok_or_else(too_large)?;

        Ok(Layout {
            descriptor: descriptor.to_owned(),
            fields,
            record_size,
            packed_size: packed_offset,
            max_width,
        })
    }

    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn fields(&self) -> &[FieldEntry] {
        &self.fields
    }

    /// Native bytes per record, including alignment padding.
    pub fn record_size(&self) -> usize {
        self.record_size
    }

    /// Packed bytes per record, no padding.
    pub fn packed_size(&self) -> usize {
        self.packed_size
    }

    /// Widest primitive in the record.
    pub fn max_width(&self) -> usize {
        self.max_width
    }
}

/// Native record size of a descriptor, without keeping the field table.
pub fn struct_size(descriptor: &str) -> Result<usize> {
    Layout::parse(descriptor).map(|l| l.record_size())
}

#[inline]
fn align_up(value: usize, align: usize) -> Option<usize> {
    debug_assert!(align.is_power_of_two());
    Some(value.checked_add(align - 1)? & !(align - 1))
}

/// Split a descriptor into `(repeat, primitive)` runs.
/// Whitespace between tokens is skipped; a missing count means 1.
fn tokenize(descriptor: &str) -> Result<Vec<(usize, Primitive)>> {
    let mut runs = Vec::new();
    let mut rest = descriptor.trim_start();

    while !rest.is_empty() {
        let token = rest;
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let count = if digits == 0 {
            1
        } else {
            let text = &rest[..digits];
            let n: usize = text
                .parse()
                .map_err(|_| PackError::RepeatOverflow(text.to_owned()))?;
            if n == 0 {
                return Err(PackError::ZeroRepeat);
            }
            n
        };

        rest = rest[digits..].trim_start();
        let mut chars = rest.chars();
        // A count with no type code after it.
        let Some(code) = chars.next() else {
            return Err(PackError::TrailingInput(token.trim_end().to_owned()));
        };
        runs.push((count, Primitive::from_code(code)?));
        rest = chars.as_str().trim_start();
    }

    Ok(runs)
}

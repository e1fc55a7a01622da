use crate::descriptor::Layout;
use crate::error::{PackError, Result};

/// Pull source of packed bytes for the emitter.
///
/// `next_chunk` fills the front of `dst` and returns how many bytes it
/// wrote. It must make progress whenever `has_next()` is true and `dst`
/// holds at least `record_len()` bytes.
pub trait BinaryConvertor {
    fn has_next(&self) -> bool;

    /// Packed size of the largest unit a single `next_chunk` call emits.
    fn record_len(&self) -> usize;

    fn next_chunk(&mut self, dst: &mut [u8]) -> usize;
}

/// Walks a buffer of native records and packs them per a [`Layout`].
///
/// Chunks are cut on element boundaries, so a record wider than the
/// caller's buffer is packed across several `next_chunk` calls.
#[derive(Debug)]
pub struct RawDataPacker<'a> {
    src: &'a [u8],
    layout: &'a Layout,
    /// Start of the current native record.
    cursor: usize,
    /// Run within the current record.
    field: usize,
    /// Element within the current run.
    element: usize,
}

impl<'a> RawDataPacker<'a> {
    /// `src` must hold a whole number of native records.
    pub fn new(src: &'a [u8], layout: &'a Layout) -> Result<Self> {
        let record_size = layout.record_size();
        if src.len() % record_size != 0 {
            return Err(PackError::PartialRecord {
                len: src.len(),
                record_size,
            });
        }
        Ok(RawDataPacker {
            src,
            layout,
            cursor: 0,
            field: 0,
            element: 0,
        })
    }

    /// Records not yet fully packed.
    pub fn remaining_records(&self) -> usize {
        (self.src.len() - self.cursor) / self.layout.record_size()
    }
}

impl BinaryConvertor for RawDataPacker<'_> {
    #[inline]
    fn has_next(&self) -> bool {
        self.cursor < self.src.len()
    }

    fn record_len(&self) -> usize {
        self.layout.max_width()
    }

    fn next_chunk(&mut self, dst: &mut [u8]) -> usize {
        let fields = self.layout.fields();
        let mut wp = 0;

        while self.has_next() {
            let run = &fields[self.field];
            let width = run.width();
            let n = ((dst.len() - wp) / width).min(run.count - self.element);
            if n == 0 {
                break;
            }

            let (offset, _) = run.element(self.element);
            let src = &self.src[self.cursor + offset..self.cursor + offset + n * width];
            for (value, out) in src
                .chunks_exact(width)
                .zip(dst[wp..wp + n * width].chunks_exact_mut(width))
            {
                run.primitive.pack(value, out);
            }
            wp += n * width;
            self.element += n;

            if self.element == run.count {
                self.element = 0;
                self.field += 1;
                if self.field == fields.len() {
                    self.field = 0;
                    self.cursor += self.layout.record_size();
                }
            }
        }
        wp
    }
}

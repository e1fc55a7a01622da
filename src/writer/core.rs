use log::debug;
use zerocopy::{Immutable, IntoBytes};

use crate::descriptor::Layout;
use crate::emitter::Base64Emitter;
use crate::error::{PackError, Result};
use crate::packer::{BinaryConvertor, RawDataPacker};
use crate::sink::DocumentSink;

/// Width of the header token that precedes the packed data.
pub const HEADER_SIZE: usize = 24;

/// Render the header token: the descriptor, one space, then space padding
/// up to `HEADER_SIZE` bytes.
pub fn make_header(dt: &str) -> Result<String> {
    if dt.len() + 1 >= HEADER_SIZE {
        return Err(PackError::HeaderTooLong {
            descriptor: dt.to_owned(),
            width: HEADER_SIZE,
        });
    }
    let mut header = String::with_capacity(HEADER_SIZE);
    header.push_str(dt);
    header.push(' ');
    while header.len() < HEADER_SIZE {
        header.push(' ');
    }
    Ok(header)
}

/// Writes one base64-packed array into a document.
///
/// The first write fixes the descriptor and emits the header; later writes
/// must use the identical descriptor. The payload is closed when the writer
/// is finished or dropped, including after a failed write.
pub struct Base64Writer<S: DocumentSink> {
    emitter: Base64Emitter<S>,
    layout: Option<Layout>,
    header: Option<String>,
}

impl<S: DocumentSink> Base64Writer<S> {
    pub fn new(sink: S) -> Result<Self> {
        Ok(Base64Writer {
            emitter: Base64Emitter::new(sink)?,
            layout: None,
            header: None,
        })
    }

    /// Descriptor fixed by the first write, if any.
    pub fn descriptor(&self) -> Option<&str> {
        self.layout.as_ref().map(Layout::descriptor)
    }

    /// Pack `data`, a buffer of native records described by `dt`.
    /// `data.len()` must be a multiple of the native record size.
    pub fn write(&mut self, data: &[u8], dt: &str) -> Result<()> {
        let Base64Writer {
            emitter,
            layout,
            header,
        } = self;
        let layout = check_dt(layout, header, dt)?;
        let mut packer = RawDataPacker::new(data, layout)?;
        if let Some(header) = header.take() {
            emitter.write(header.as_bytes())?;
        }
        emitter.write_convertor(&mut packer)
    }

    /// Pack a typed slice whose in-memory layout matches `dt`.
    pub fn write_slice<T: IntoBytes + Immutable>(&mut self, data: &[T], dt: &str) -> Result<()> {
        self.write(data.as_bytes(), dt)
    }

    /// Stream bytes from a caller-supplied convertor. The convertor must
    /// already produce the packed layout that `dt` describes.
    pub fn write_convertor<C: BinaryConvertor + ?Sized>(
        &mut self,
        convertor: &mut C,
        dt: &str,
    ) -> Result<()> {
        check_dt(&mut self.layout, &mut self.header, dt)?;
        if let Some(header) = self.header.take() {
            self.emitter.write(header.as_bytes())?;
        }
        self.emitter.write_convertor(convertor)
    }

    /// Close the payload and report any error from the final flush.
    pub fn finish(self) -> Result<()> {
        self.emitter.finish()
    }
}

/// Cache the layout on first use, or verify `dt` against the cached one.
/// A fresh header is staged in `header` only on first use.
fn check_dt<'l>(
    cached: &'l mut Option<Layout>,
    header: &mut Option<String>,
    dt: &str,
) -> Result<&'l Layout> {
    match *cached {
        Some(ref layout) => {
            if layout.descriptor() != dt {
                return Err(PackError::DescriptorMismatch {
                    expected: layout.descriptor().to_owned(),
                    found: dt.to_owned(),
                });
            }
            Ok(layout)
        }
        None => {
            let staged = make_header(dt)?;
            let layout = Layout::parse(dt)?;
            debug!(
                "cached descriptor '{}' (record {} bytes, packed {} bytes)",
                dt,
                layout.record_size(),
                layout.packed_size()
            );
            *header = Some(staged);
            Ok(cached.insert(layout))
        }
    }
}

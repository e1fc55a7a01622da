use std::io;

use log::{debug, trace, warn};

use crate::base64::{encode_into, encoded_buffer_len};
use crate::error::Result;
use crate::packer::BinaryConvertor;
use crate::sink::{DocumentSink, Framing};

/// Accumulation buffer size. Must stay a multiple of 3 so that only the
/// final block of a payload ever carries `=` padding.
pub const BUFFER_LEN: usize = 48;

const _: () = assert!(BUFFER_LEN % 3 == 0);

const ENCODED_LEN: usize = encoded_buffer_len(BUFFER_LEN, true);

/// Scratch size used when pulling bytes from a [`BinaryConvertor`].
pub const CONVERT_CHUNK: usize = 1024;

/// Opening token of an inline payload.
pub const INLINE_MARKER: &str = "\"$base64$";

/// Closing token of an inline payload.
pub const INLINE_CLOSE: &str = "\"";

/// Streams bytes into a sink as base64 text, one 48-byte block at a time.
///
/// The framing is read from the sink once, at construction. Dropping the
/// emitter finalizes it; call [`finish`](Self::finish) to observe errors from
/// the last flush.
pub struct Base64Emitter<S: DocumentSink> {
    sink: S,
    framing: Framing,
    binary: [u8; BUFFER_LEN],
    len: usize,
    encoded: [u8; ENCODED_LEN],
    line: String,
    finished: bool,
}

impl<S: DocumentSink> Base64Emitter<S> {
    pub fn new(mut sink: S) -> Result<Self> {
        let framing = sink.framing();
        match framing {
            Framing::Inline => sink.append_text(INLINE_MARKER)?,
            // Start the payload on a clean line.
            Framing::LineWrapped => sink.flush()?,
        }
        debug!("base64 emitter opened ({:?})", framing);

        Ok(Base64Emitter {
            sink,
            framing,
            binary: [0; BUFFER_LEN],
            len: 0,
            encoded: [0; ENCODED_LEN],
            line: String::new(),
            finished: false,
        })
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    /// Bytes accumulated but not yet encoded (always below `BUFFER_LEN`
    /// between calls).
    pub fn pending_len(&self) -> usize {
        self.len
    }

    /// Append raw bytes, flushing every time the buffer fills.
    pub fn write(&mut self, mut data: &[u8]) -> Result<()> {
        while !data.is_empty() {
            let n = data.len().min(BUFFER_LEN - self.len);
            self.binary[self.len..self.len + n].copy_from_slice(&data[..n]);
            self.len += n;
            data = &data[n..];

            if self.len == BUFFER_LEN {
                self.flush_block()?;
            }
        }
        Ok(())
    }

    /// Drain a convertor through a bounded scratch buffer.
    pub fn write_convertor<C: BinaryConvertor + ?Sized>(&mut self, convertor: &mut C) -> Result<()> {
        let mut chunk = vec![0u8; CONVERT_CHUNK.max(convertor.record_len())];
        while convertor.has_next() {
            let n = convertor.next_chunk(&mut chunk);
            if n == 0 {
                debug_assert!(false, "convertor reported data but produced none");
                break;
            }
            self.write(&chunk[..n])?;
        }
        Ok(())
    }

    /// Encode the accumulated bytes and hand them to the sink.
    /// Returns `false` when there was nothing to flush.
    pub fn flush_block(&mut self) -> Result<bool> {
        let n = encode_into(&self.binary[..self.len], &mut self.encoded);
        if n == 0 {
            return Ok(false);
        }
        trace!("flushing {} bytes as {} base64 chars", self.len, n);
        self.len = 0;

        let text = std::str::from_utf8(&self.encoded[..n])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        match self.framing {
            Framing::Inline => self.sink.append_text(text)?,
            Framing::LineWrapped => {
                self.line.clear();
                self.line
                    .extend(std::iter::repeat_n(' ', self.sink.indent()));
                self.line.push_str(text);
                self.line.push('\n');
                self.sink.append_text(&self.line)?;
                self.sink.flush()?;
            }
        }
        Ok(true)
    }

    /// Flush the padded tail and close the framing.
    pub fn finish(mut self) -> Result<()> {
        self.finalize()
    }

    fn finalize(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        // Never retried, even if the sink fails below.
        self.finished = true;

        // The closing quote is attempted even when the tail flush fails.
        let tail = self.flush_block().map(drop);
        let close: Result<()> = match self.framing {
            Framing::Inline => self
                .sink
                .append_text(INLINE_CLOSE)
                .and_then(|()| self.sink.flush())
                .map_err(Into::into),
            Framing::LineWrapped => Ok(()),
        };
        tail.and(close)?;
        debug!("base64 emitter closed");
        Ok(())
    }
}

impl<S: DocumentSink> Drop for Base64Emitter<S> {
    fn drop(&mut self) {
        if let Err(e) = self.finalize() {
            warn!("base64 emitter: final flush failed: {}", e);
        }
    }
}

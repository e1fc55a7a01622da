use std::io::{self, Write};

/// Textual convention the payload is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framing {
    /// One quoted string token: `"$base64$...."` (JSON-style documents).
    Inline,
    /// One indented line per flushed block (YAML-style documents).
    LineWrapped,
}

/// The narrow slice of a document writer the emitter needs.
pub trait DocumentSink {
    /// Append raw characters at the current output position.
    fn append_text(&mut self, text: &str) -> io::Result<()>;

    /// Materialize whatever the sink has buffered.
    fn flush(&mut self) -> io::Result<()>;

    /// Current nesting depth, in spaces, used to indent wrapped lines.
    fn indent(&self) -> usize;

    fn framing(&self) -> Framing;
}

impl<S: DocumentSink + ?Sized> DocumentSink for &mut S {
    fn append_text(&mut self, text: &str) -> io::Result<()> {
        (**self).append_text(text)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn indent(&self) -> usize {
        (**self).indent()
    }

    fn framing(&self) -> Framing {
        (**self).framing()
    }
}

/// In-memory sink that collects everything into a `String`.
#[derive(Debug, Clone)]
pub struct TextSink {
    framing: Framing,
    indent: usize,
    text: String,
    flushes: usize,
}

impl TextSink {
    pub fn new(framing: Framing) -> Self {
        TextSink {
            framing,
            indent: 0,
            text: String::new(),
            flushes: 0,
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn set_indent(&mut self, indent: usize) {
        self.indent = indent;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Number of `flush` calls received so far.
    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl DocumentSink for TextSink {
    fn append_text(&mut self, text: &str) -> io::Result<()> {
        self.text.push_str(text);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn indent(&self) -> usize {
        self.indent
    }

    fn framing(&self) -> Framing {
        self.framing
    }
}

/// Staged text is handed to the writer once it reaches this many bytes.
pub const STAGE_CAPACITY: usize = 4096;

/// Sink that stages text in memory and hands it to a writer on `flush`, or
/// earlier once `STAGE_CAPACITY` bytes are staged. The staging area stays
/// bounded even for a long inline payload, which never flushes mid-way.
pub struct StreamSink<W: Write> {
    out: W,
    buf: String,
    framing: Framing,
    indent: usize,
}

impl<W: Write> StreamSink<W> {
    pub fn new(out: W, framing: Framing) -> Self {
        StreamSink {
            out,
            buf: String::with_capacity(STAGE_CAPACITY),
            framing,
            indent: 0,
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Text appended since the last flush.
    pub fn pending(&self) -> &str {
        &self.buf
    }

    /// Flush any staged text and return the writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        DocumentSink::flush(&mut self)?;
        Ok(self.out)
    }
}

impl<W: Write> DocumentSink for StreamSink<W> {
    fn append_text(&mut self, text: &str) -> io::Result<()> {
        self.buf.push_str(text);
        if self.buf.len() >= STAGE_CAPACITY {
            self.out.write_all(self.buf.as_bytes())?;
            self.buf.clear();
        }
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            self.out.write_all(self.buf.as_bytes())?;
            self.buf.clear();
        }
        self.out.flush()
    }

    fn indent(&self) -> usize {
        self.indent
    }

    fn framing(&self) -> Framing {
        self.framing
    }
}

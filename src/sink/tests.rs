use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;

use crate::sink::*;
use crate::writer::Base64Writer;

#[test]
fn test_text_sink_collects_and_counts_flushes() {
    let mut sink = TextSink::new(Framing::LineWrapped).with_indent(4);
    sink.append_text("abc").unwrap();
    sink.append_text("def").unwrap();
    sink.flush().unwrap();
    assert_eq!(sink.as_str(), "abcdef");
    assert_eq!(sink.flush_count(), 1);
    assert_eq!(sink.indent(), 4);
    assert_eq!(sink.framing(), Framing::LineWrapped);
    sink.set_indent(2);
    assert_eq!(sink.indent(), 2);
}

#[test]
fn test_stream_sink_writes_only_on_flush() {
    let mut sink = StreamSink::new(Vec::new(), Framing::Inline);
    sink.append_text("hello ").unwrap();
    sink.append_text("world").unwrap();
    assert_eq!(sink.pending(), "hello world");
    sink.flush().unwrap();
    assert_eq!(sink.pending(), "");
    sink.append_text("!").unwrap();
    let out = sink.into_inner().unwrap();
    assert_eq!(out, b"hello world!");
}

#[test]
fn test_mut_ref_forwards() {
    let mut sink = TextSink::new(Framing::Inline).with_indent(3);
    {
        let mut r = &mut sink;
        r.append_text("x").unwrap();
        DocumentSink::flush(&mut r).unwrap();
        assert_eq!(r.indent(), 3);
        assert_eq!(r.framing(), Framing::Inline);
    }
    assert_eq!(sink.as_str(), "x");
    assert_eq!(sink.flush_count(), 1);
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_stream_sink_propagates_write_errors() {
    let mut sink = StreamSink::new(FailingWriter, Framing::LineWrapped);
    sink.append_text("data").unwrap();
    let err = sink.flush().unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
}

#[test]
fn test_stream_sink_spills_when_stage_fills() {
    let mut sink = StreamSink::new(Vec::new(), Framing::Inline);
    let chunk = "A".repeat(64);
    for _ in 0..1000 {
        sink.append_text(&chunk).unwrap();
        assert!(sink.pending().len() < STAGE_CAPACITY);
    }
    let out = sink.into_inner().unwrap();
    assert_eq!(out.len(), 64 * 1000);
    assert!(out.iter().all(|&b| b == b'A'));
}

/// Writer that only counts the bytes it receives.
struct CountingWriter {
    written: Rc<Cell<usize>>,
}

impl Write for CountingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.set(self.written.get() + buf.len());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_stream_sink_bounded_during_large_inline_write() {
    let written = Rc::new(Cell::new(0));
    let out = CountingWriter {
        written: Rc::clone(&written),
    };
    let mut sink = StreamSink::new(out, Framing::Inline);
    let data = vec![0x5Au8; 3_000_000];
    {
        let mut writer = Base64Writer::new(&mut sink).unwrap();
        writer.write(&data, "u").unwrap();
        // Mid-payload: 62500 full blocks are encoded, and all but the
        // staged remainder has reached the writer.
        assert!(written.get() > 9 + 62_500 * 64 - STAGE_CAPACITY);
        writer.finish().unwrap();
    }
    assert_eq!(sink.pending(), "");
    // Marker, 3_000_024 bytes encoded, closing quote.
    assert_eq!(written.get(), 9 + 4_000_032 + 1);
}

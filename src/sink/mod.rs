mod core;

#[cfg(test)]
mod tests;

pub use self::core::{DocumentSink, Framing, STAGE_CAPACITY, StreamSink, TextSink};

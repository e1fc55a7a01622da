mod core;


pub use self::core::{BUFFER_LEN, Base64Emitter, CONVERT_CHUNK, INLINE_CLOSE, INLINE_MARKER};

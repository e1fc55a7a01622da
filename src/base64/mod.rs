mod core;


pub use self::core::{encode_into, encode_to_string, encoded_buffer_len};

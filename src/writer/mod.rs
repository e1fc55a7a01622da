mod core;


pub use self::core::{Base64Writer, HEADER_SIZE, make_header};

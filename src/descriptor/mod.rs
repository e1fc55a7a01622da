mod core;


pub use self::core::{FieldEntry, Layout, Primitive, struct_size};

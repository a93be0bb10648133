mod primitive;
pub use primitive::Primitive;

mod primitive_chrono;

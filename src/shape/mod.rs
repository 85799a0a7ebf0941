//! Primitives that can be stored in a bounding volume hierarchy.

pub use self::primitive::Primitive;
pub use self::triangle::Triangle;

mod primitive;
mod triangle;

//! Primitive coders and the combinators built from them.

pub mod array;
pub mod primitives;
pub mod string;

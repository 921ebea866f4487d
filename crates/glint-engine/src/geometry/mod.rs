//! Static vertex data uploaded once at startup.

mod triangle;

pub use triangle::{POSITION_ATTRIBUTE, Position, TRIANGLE, TriangleGeometry};

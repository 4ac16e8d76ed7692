//! Conversions between the flat storage shape and the nested editor shape.
mod flatten;
mod project;

pub use flatten::flatten;
pub use project::project;

pub mod definition;
pub mod tree;

pub use definition::*;
pub use tree::*;

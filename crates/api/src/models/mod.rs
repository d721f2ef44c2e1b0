pub mod chunk;
pub mod document;
pub mod id;
pub mod location;
pub mod package;

pub use chunk::*;
pub use document::*;
pub use id::*;
pub use location::*;
pub use package::*;

//! Session-document persistence and room plumbing. The engine stays pure;
//! loading, saving and room codes live here.

pub mod code;
pub mod load;
pub mod store;

pub use code::*;
pub use load::*;
pub use store::*;

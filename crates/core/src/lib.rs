//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod config;
pub mod deck;
pub mod events;
pub mod rng;
pub mod rules;
pub mod scoring;
pub mod session;

pub use cards::*;
pub use config::*;
pub use deck::*;
pub use events::*;
pub use rng::*;
pub use rules::*;
pub use scoring::*;
pub use session::*;

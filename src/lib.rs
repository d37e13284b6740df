//! A tile-based side-scrolling platformer.
//!
//! The library holds pure game logic only: level parsing, entity data,
//! collision resolution and the per-frame state machine.  The binary wraps
//! it in a terminal front-end.

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod level;
pub mod physics;
pub mod scenery;

//! iconsmith Core Library
//!
//! Configuration, themes, codepoints and error handling shared by the
//! iconsmith generator and CLI.

pub mod codepoint;
pub mod config;
pub mod error;
pub mod theme;

pub use codepoint::{Codepoint, CodepointAllocator};
pub use config::Config;
pub use error::{CoreError, Result};
pub use theme::{StyleSource, Theme};

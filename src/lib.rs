//! Small Area Fair Market Rent lookup and ranking.
//!
//! The core is [`data`]: a rent table loaded once per process, a point
//! lookup by ZIP code, and a region ranking with bounds and pagination.
//! [`state`] holds the rendering-independent session state the desktop
//! shell drives.

pub mod config;
pub mod data;
pub mod format;
pub mod state;

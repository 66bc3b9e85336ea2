//! Core types for the wheel bot: options, the wheel document, and the
//! weighted draw engine.
//!
//! Nothing in this crate performs I/O. Persistence lives in `wheel-store`,
//! command handling in `wheel-bot`.

pub mod draw;
pub mod error;
pub mod option;
pub mod wheel;

pub use draw::{Draw, filter_by_tags, rebalance, weighted_pick};
pub use error::{WheelError, WheelResult};
pub use option::WheelOption;
pub use wheel::{AddReport, TagReport, Wheel};

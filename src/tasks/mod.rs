//! Background Tasks Module
//!
//! # Tasks
//! - Trim: Removes expired and past-RCT content at a fixed interval

mod trim;

pub use trim::{spawn_trim_task, SharedContentStore};

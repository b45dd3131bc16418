//! The device module contains the expander backends routing operations can run against.
//!
//! In most cases you will not need anything from here explicitly, the exposed types at the root of
//! the crate should be enough.

pub mod hal;
#[cfg(test)]
pub(crate) mod recording;
pub mod sysfs;

//! Configuration sources.
//!
//! A source takes the flat map accumulated so far and returns it with its own
//! entries laid on top. Sources never remove keys, and they parse everything
//! they need before touching the map, so a failed source leaves no trace.

mod buffer;
mod env;
mod file;
mod overrides;
mod structural;

pub use buffer::{BufferSource, Format};
pub use env::EnvSource;
pub use file::FileSource;
pub use overrides::OverrideSource;
pub use structural::StructSource;

use crate::error::Result;
use crate::flatten::FlatMap;

/// Something that can lay configuration entries over a flat map.
pub trait Source: std::fmt::Debug {
    /// Return `flat` with this source's entries merged in.
    ///
    /// Every key of `flat` is still present in the result, possibly with a
    /// new value.
    fn overlay(&self, flat: FlatMap) -> Result<FlatMap>;
}

impl<S: Source + ?Sized> Source for &S {
    fn overlay(&self, flat: FlatMap) -> Result<FlatMap> {
        (**self).overlay(flat)
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn overlay(&self, flat: FlatMap) -> Result<FlatMap> {
        (**self).overlay(flat)
    }
}

//! Waypoint library exports

pub mod core;
pub mod demo;
pub mod host;
pub mod nav;

#[cfg(test)]
pub mod test_support;

pub use crate::core::style::Style;
pub use crate::host::{Host, Scene, Screen, ScreenSpec, TabsSpec};
pub use crate::nav::{NavError, Navigator, Pending, ReadySignal, Snapshot};

#![forbid(unsafe_code)]

//! Core: sheet geometry, host-driven timers, and the page surface contract.
//!
//! # Role in SheetUI
//! `sheetui-core` holds everything a sheet needs that is not the sheet
//! itself: the responsive geometry function, the timer queue its animation
//! delays run on, and the [`SheetSurface`](surface::SheetSurface) trait that
//! stands in for the page DOM.
//!
//! # How it fits in the system
//! `sheetui-stack` drives sheets against a `SheetSurface`. The browser
//! binding (`sheetui-web`) implements the surface over `web-sys`; tests and
//! DOM-less hosts use [`HeadlessSurface`](headless::HeadlessSurface).

pub mod geometry;
pub mod headless;
pub mod surface;
pub mod timer;

#[cfg(feature = "tracing-json")]
pub mod logging;

pub use geometry::{Breakpoint, SheetGeometry, compute_geometry, compute_geometry_with_max};
pub use headless::{ElementStyle, HeadlessSurface, MountedSheet};
pub use surface::{PreconditionFault, SheetId, SheetRole, SheetSurface, StyleChange};
pub use timer::{DeterministicClock, MonotonicClock, TimerId, TimerQueue, WallClock};

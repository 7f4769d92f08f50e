#![forbid(unsafe_code)]

//! Stacked slide-in sheets.
//!
//! # Role in SheetUI
//! `sheetui-stack` is the presentation manager: [`Sheet`] runs one panel's
//! enter/close state machine, and [`SheetStack`] keeps the ordered stack,
//! opens sheets from trusted HTML or a URL, and keeps the dim/peek/pointer
//! treatment of every sheet consistent with its position.
//!
//! # How it fits in the system
//! Everything page-facing goes through a
//! [`SheetSurface`](sheetui_core::surface::SheetSurface); everything
//! time-facing goes through the stack's timer queue, advanced by the host
//! with [`SheetStack::advance`]. Remote content comes from a
//! [`ContentLoader`].

pub mod config;
pub mod content;
pub mod sheet;
pub mod stack;

#[cfg(feature = "config")]
pub use config::ConfigError;
pub use config::{SheetConfig, StackConfig, StackingConfig};
pub use content::{ContentLoadError, ContentLoader, FragmentLoader, load_content};
pub use sheet::{Sheet, SheetPhase, SheetSignal, SheetTimer, StackVisual};
pub use stack::{SheetStack, StackEvent};

pub use sheetui_core::surface::{SheetId, SheetRole, SheetSurface};

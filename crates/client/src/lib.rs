//! Client side of the page protocol: visits, version conflicts, partial reloads.

pub mod error;
pub mod navigator;
pub mod pages;

pub use error::NavigationError;
pub use navigator::{Navigator, VisitOutcome, VisitPhase};

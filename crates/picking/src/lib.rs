#![warn(missing_docs)]
//! Pointer picking for the scene viewer.
//!
//! Pointer positions are normalized into device coordinates, turned into a
//! camera ray and cast through every surface in the scene. The
//! [`PointerController`] then applies the hover and click color policy to the
//! nearest hit.

mod controller;
mod pointer;
mod raycast;

pub use controller::{HighlightState, PointerController, PointerOutcome, DEFAULT_HOVER_COLOR};
pub use pointer::PointerSample;
pub use raycast::{intersect_scene, pick, Hit};

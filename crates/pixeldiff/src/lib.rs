//! Pixel-level comparison of rendered page screenshots.
//!
//! This crate reconciles two RGBA captures of possibly different dimensions
//! onto a shared canvas size and computes a perceptual per-pixel diff with a
//! visualization image highlighting every differing pixel.

pub mod compare;
pub mod reconcile;

pub use compare::{DiffOptions, DiffOutcome, PixelDiffError, diff};
pub use reconcile::reconcile;

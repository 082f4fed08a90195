//! # Gridserve Core
//!
//! Core types for the gridserve page renderer.
//!
//! This crate provides the pieces every other gridserve component builds on:
//! - The unified error type
//! - The grid data model (cells, boundary markers, page data)
//! - Resolution of query parameters into a concrete grid layout

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod grid;
pub mod layout;

pub use error::{Error, Result};
pub use grid::{Boundaries, Cell, Grid, PageData};
pub use layout::{GridLayout, GridQuery, LayoutDefaults};

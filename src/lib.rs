//! Restaurant analytics dashboard.
//!
//! [`data`] is the rendering-free core: CSV loading, the dataset cache, filter
//! criteria and the aggregates computed over a filtered view. [`app`],
//! [`state`] and [`ui`] are the egui front end that displays them.

pub mod app;
pub mod color;
pub mod data;
pub mod state;
pub mod ui;

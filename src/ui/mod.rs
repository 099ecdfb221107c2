//! Presentation layer: egui widgets that render the data layer's outputs.

pub mod dashboard;
pub mod panels;
pub mod plot;

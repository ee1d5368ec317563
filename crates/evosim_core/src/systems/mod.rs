//! Per-creature behavior, split by phase of the tick.

pub mod action;
pub mod biological;
pub mod feeding;
pub mod perception;
pub mod reproduction;

//! UI components.

pub mod family_graph;

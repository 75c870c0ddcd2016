//! Reusable UI components.

pub mod skill_graph;

mod component;
mod interaction;
mod physics;
mod render;
mod state;
mod types;

pub use component::SkillGraphCanvas;
pub use interaction::{Highlight, Interaction, InteractionController, NavigationIntent};
pub use physics::{Body, LayoutEngine, LayoutParams};
pub use types::{GraphData, GraphError, GraphLink, GraphNode, NodeIdx, NodeKind, ProjectInfo};

mod component;
mod layout;
mod render;
mod state;
mod store;
mod text;
mod types;

pub use component::FlowGraphCanvas;
pub use layout::{Direction, layout_graph};
pub use store::GraphStore;
pub use types::{EdgeStyle, GraphData, GraphEdge, GraphNode, NodeKind, NodeStatus};

mod component;
pub mod geometry;
pub mod keymap;
pub mod layout;
pub mod prepare;
mod render;
pub mod shape;
pub mod state;
pub mod types;

pub use component::FlowchartCanvas;
pub use layout::{GridOptions, SortKey};
pub use shape::ShapeKind;
pub use types::{EdgeTools, GraphData, GraphLink, GraphNode};

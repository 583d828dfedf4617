mod cavern;
mod generator;
pub(crate) mod graph;
mod views;

pub use cavern::{EscapeCavern, ExplorationCavern};
pub use generator::{Cave, GenerateError, generate};
pub use graph::{Edge, Graph, Node};
pub use views::{EscapeView, ExplorationView, NeighborStatus};

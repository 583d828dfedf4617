mod escape;
mod explore;
mod game;

pub use escape::{EscapeMode, EscapePlanner, EscapeReport};
pub use explore::{ExplorationReport, ExplorePlanner};
pub use game::{Game, GameReport};

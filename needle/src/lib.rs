pub mod random;
pub mod resolver;
pub mod tracker;

pub use random::{ClockSeeded, RandomSource, SeededRandom};
pub use resolver::{Resolve, StopResolver};
pub use tracker::PositionTracker;
pub use zones::{Error, Zone, ZoneTable};

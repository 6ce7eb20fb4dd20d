pub mod engine;

pub use engine::{QueryEngine, RankedQuestion, Ranking, ThreadEntry};

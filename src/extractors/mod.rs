mod heuristic;

pub use heuristic::HeuristicExtractor;

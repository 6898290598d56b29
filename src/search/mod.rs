//! Order search: candidate grid, parallel evaluation, ranking and progress.

mod engine;
mod grid;
mod progress;
mod result;

pub use engine::{default_concurrency, evaluate_candidate, search, SearchOptions};
pub use grid::OrderGrid;
pub use progress::{LogProgress, NoProgress, RecordingProgress, SearchProgress};
pub use result::{CandidateOutcome, SearchResult, SearchTable};

pub mod search;

pub use search::{Searcher, select_move};

use web_time::{Duration, Instant};

use crate::board::Board;
use crate::types::{Mark, Outcome};

// Fixed perspective: positive favors O, negative favors X.
const X_WIN_SCORE: i32 = -10;
const O_WIN_SCORE: i32 = 10;
const DRAW_SCORE: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scored {
    pos: Option<usize>,
    score: i32,
}

/// Full-depth minimax over the remaining game tree.
#[derive(Debug, Default)]
pub struct Searcher {
    nodes: u64,
    elapsed: Duration,
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the optimal cell for `mark`. Equal scores resolve to the
    /// lowest index.
    /// Caller contract: `board` is neither full nor decided.
    pub fn search(&mut self, board: &Board, mark: Mark) -> Result<usize, String> {
        let best = self.run(board, mark)?;
        let pos = best
            .pos
            .ok_or_else(|| "search found no candidate move".to_string())?;

        log::debug!(
            "minimax {mark} -> {pos} (score {}, {} nodes, {:?})",
            best.score,
            self.nodes,
            self.elapsed
        );
        Ok(pos)
    }

    /// Game-theoretic value of `board` with `mark` to move.
    pub fn score(&mut self, board: &Board, mark: Mark) -> Result<i32, String> {
        self.run(board, mark).map(|best| best.score)
    }

    /// Positions visited by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn run(&mut self, board: &Board, mark: Mark) -> Result<Scored, String> {
        match board.outcome() {
            Outcome::InProgress => {}
            Outcome::Win(winner) => {
                return Err(format!("cannot search a decided board ({winner} has won)"));
            }
            Outcome::Draw => return Err("cannot search a full board".to_string()),
        }

        let start = Instant::now();
        self.nodes = 0;
        let best = self.minimax(board, mark);
        self.elapsed = start.elapsed();
        Ok(best)
    }

    fn minimax(&mut self, board: &Board, mark: Mark) -> Scored {
        self.nodes += 1;

        if let Some(score) = terminal_score(board) {
            return Scored { pos: None, score };
        }

        let mut best = Scored {
            pos: None,
            score: worst_score(mark),
        };

        for pos in board.empty_cells() {
            let mut next = *board;
            next.place(pos, mark);
            let score = self.minimax(&next, mark.opponent()).score;

            if is_better(mark, score, best.score) {
                best = Scored {
                    pos: Some(pos),
                    score,
                };
            }
        }

        best
    }
}

/// Picks the optimal move for `mark` with a fresh `Searcher`.
pub fn select_move(board: &Board, mark: Mark) -> Result<usize, String> {
    Searcher::new().search(board, mark)
}

fn terminal_score(board: &Board) -> Option<i32> {
    match board.outcome() {
        Outcome::Win(Mark::X) => Some(X_WIN_SCORE),
        Outcome::Win(Mark::O) => Some(O_WIN_SCORE),
        Outcome::Draw => Some(DRAW_SCORE),
        Outcome::InProgress => None,
    }
}

// Strict comparison keeps the first candidate among equals.
fn is_better(mark: Mark, score: i32, best: i32) -> bool {
    match mark {
        Mark::O => score > best,
        Mark::X => score < best,
    }
}

fn worst_score(mark: Mark) -> i32 {
    match mark {
        Mark::O => i32::MIN,
        Mark::X => i32::MAX,
    }
}

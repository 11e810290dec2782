use std::fmt;
use std::str::FromStr;

use crate::types::{CELL_EMPTY, Mark, Outcome};

pub const BOARD_WIDTH: usize = 3;
pub const NUM_CELLS: usize = BOARD_WIDTH * BOARD_WIDTH;

/// Rows, columns, then diagonals.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Tic-tac-toe board, row-major, indices 0..=8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [Option<Mark>; NUM_CELLS],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Option<Mark>; NUM_CELLS]) -> Self {
        Self { cells }
    }

    /// Decodes `[u8]` cells (0=empty, 1=X, 2=O) and checks the board could
    /// arise from legal play.
    pub fn from_array(cells: &[u8]) -> Result<Self, String> {
        if cells.len() != NUM_CELLS {
            return Err(format!(
                "board must have {NUM_CELLS} cells, got {}",
                cells.len()
            ));
        }

        let mut board = Self::new();
        for (pos, &code) in cells.iter().enumerate() {
            board.cells[pos] = match code {
                CELL_EMPTY => None,
                _ => Some(
                    Mark::from_code(code)
                        .ok_or_else(|| format!("invalid cell value {code} at index {pos}"))?,
                ),
            };
        }

        if !board.is_consistent() {
            return Err("board is not reachable by legal play".to_string());
        }
        Ok(board)
    }

    pub fn get(&self, pos: usize) -> Option<Mark> {
        self.cells.get(pos).copied().flatten()
    }

    pub fn is_empty_at(&self, pos: usize) -> bool {
        pos < NUM_CELLS && self.cells[pos].is_none()
    }

    /// Puts `mark` on `pos`.
    /// Returns `false` and leaves the board unchanged when `pos` is out of
    /// range or already taken.
    pub fn place(&mut self, pos: usize, mark: Mark) -> bool {
        if !self.is_empty_at(pos) {
            return false;
        }
        self.cells[pos] = Some(mark);
        true
    }

    /// Empty cell indices in increasing order.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(pos, _)| pos)
    }

    pub fn count(&self, mark: Mark) -> u8 {
        self.cells.iter().filter(|&&cell| cell == Some(mark)).count() as u8
    }

    pub fn empty_count(&self) -> u8 {
        self.cells.iter().filter(|cell| cell.is_none()).count() as u8
    }

    /// Mark to move next, assuming X opened.
    pub fn next_mark(&self) -> Mark {
        if self.count(Mark::X) > self.count(Mark::O) {
            Mark::O
        } else {
            Mark::X
        }
    }

    /// X has as many marks as O or exactly one more, and a completed line
    /// belongs to whoever moved last.
    pub fn is_consistent(&self) -> bool {
        let x = self.count(Mark::X);
        let o = self.count(Mark::O);
        match (self.has_won(Mark::X), self.has_won(Mark::O)) {
            (true, true) => false,
            (true, false) => x == o + 1,
            (false, true) => x == o,
            (false, false) => x == o || x == o + 1,
        }
    }

    pub fn has_won(&self, mark: Mark) -> bool {
        WIN_LINES
            .iter()
            .any(|line| line.iter().all(|&pos| self.cells[pos] == Some(mark)))
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// X is checked before O; legal boards never satisfy both.
    pub fn outcome(&self) -> Outcome {
        if self.has_won(Mark::X) {
            Outcome::Win(Mark::X)
        } else if self.has_won(Mark::O) {
            Outcome::Win(Mark::O)
        } else if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }

    /// First completed line in `WIN_LINES` order.
    pub fn winning_line(&self) -> Option<[usize; 3]> {
        WIN_LINES.iter().copied().find(|&[a, b, c]| {
            self.cells[a].is_some()
                && self.cells[a] == self.cells[b]
                && self.cells[a] == self.cells[c]
        })
    }

    /// Converts board to `[u8; 9]` where 0=empty, 1=X, 2=O.
    pub fn to_array(&self) -> [u8; NUM_CELLS] {
        self.cells.map(|cell| cell.map_or(CELL_EMPTY, Mark::code))
    }
}

impl FromStr for Board {
    type Err = String;

    /// Parses nine cells such as `"XX.OO...."`. Empty cells may be written
    /// as `.`, `-`, `_` or a space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != NUM_CELLS {
            return Err(format!(
                "board string must have {NUM_CELLS} cells, got {}",
                chars.len()
            ));
        }

        let mut board = Self::new();
        for (pos, ch) in chars.into_iter().enumerate() {
            board.cells[pos] = match ch {
                'X' | 'x' => Some(Mark::X),
                'O' | 'o' => Some(Mark::O),
                '.' | '-' | '_' | ' ' => None,
                other => return Err(format!("invalid cell {other:?} at index {pos}")),
            };
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.cells.chunks(BOARD_WIDTH).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in cells {
                f.write_str(cell.map_or(".", Mark::as_str))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn every_win_line_is_detected_for_both_marks() {
        for line in WIN_LINES {
            for mark in [Mark::X, Mark::O] {
                let mut b = Board::new();
                for pos in line {
                    assert!(b.place(pos, mark));
                }

                assert!(b.has_won(mark));
                assert!(!b.has_won(mark.opponent()));
                assert_eq!(b.outcome(), Outcome::Win(mark));
                assert_eq!(b.winning_line(), Some(line));
            }
        }
    }

    #[test]
    fn full_board_without_line_is_draw() {
        let b = board("XOXXOOOXX");

        assert!(b.is_full());
        assert!(!b.has_won(Mark::X));
        assert!(!b.has_won(Mark::O));
        assert_eq!(b.outcome(), Outcome::Draw);
        assert_eq!(b.winning_line(), None);
    }

    #[test]
    fn win_on_last_cell_beats_draw() {
        let b = board("XOXOXOOXX");

        assert!(b.is_full());
        assert_eq!(b.outcome(), Outcome::Win(Mark::X));
    }

    #[test]
    fn partial_board_is_in_progress() {
        let b = board("XX.OO....");

        assert_eq!(b.outcome(), Outcome::InProgress);
        assert_eq!(b.empty_cells().collect::<Vec<_>>(), vec![2, 5, 6, 7, 8]);
        assert_eq!(b.next_mark(), Mark::X);
    }

    #[test]
    fn place_rejects_taken_and_out_of_range_cells() {
        let mut b = board("X........");
        let before = b;

        assert!(!b.place(0, Mark::O));
        assert!(!b.place(NUM_CELLS, Mark::O));
        assert_eq!(b, before);

        assert!(b.place(4, Mark::O));
        assert_eq!(b.get(4), Some(Mark::O));
        assert_eq!(b.count(Mark::O), 1);
        assert_eq!(b.empty_count(), 7);
    }

    #[test]
    fn next_mark_alternates_starting_with_x() {
        let mut b = Board::new();
        assert_eq!(b.next_mark(), Mark::X);

        b.place(0, Mark::X);
        assert_eq!(b.next_mark(), Mark::O);

        b.place(1, Mark::O);
        assert_eq!(b.next_mark(), Mark::X);
    }

    #[test]
    fn from_array_validates_length_codes_and_counts() {
        let b = Board::from_array(&[1, 1, 0, 2, 2, 0, 0, 0, 0]).unwrap();
        assert_eq!(b, board("XX.OO...."));
        assert_eq!(b.to_array(), [1, 1, 0, 2, 2, 0, 0, 0, 0]);

        assert!(Board::from_array(&[0; 8]).is_err());
        assert!(Board::from_array(&[3, 0, 0, 0, 0, 0, 0, 0, 0]).is_err());
        // O cannot be ahead of X.
        assert!(Board::from_array(&[2, 0, 0, 0, 0, 0, 0, 0, 0]).is_err());
        // X cannot be two marks ahead.
        assert!(Board::from_array(&[1, 1, 0, 0, 0, 0, 0, 0, 0]).is_err());
    }

    #[test]
    fn both_sides_winning_is_inconsistent() {
        assert!(!board("XXXOOO...").is_consistent());
        assert!(board("XXXOO....").is_consistent());
    }

    #[test]
    fn play_after_a_win_is_inconsistent() {
        // O moved after X completed the top row.
        assert!(!board("XXX.OO.O.").is_consistent());
        assert!(Board::from_array(&[1, 1, 1, 0, 2, 2, 0, 2, 0]).is_err());
        // X moved after O completed the middle row.
        assert!(!board("XX.OOOX.X").is_consistent());
        assert!(board("XX.OOOX..").is_consistent());
    }

    /// Visits every position of every legal game and returns the count.
    fn walk_all_games(board: Board) -> usize {
        let x_won = board.has_won(Mark::X);
        let o_won = board.has_won(Mark::O);
        assert!(!(x_won && o_won), "both marks won:\n{board}");
        assert!(board.is_consistent(), "reachable board rejected:\n{board}");

        let expected = if x_won {
            Outcome::Win(Mark::X)
        } else if o_won {
            Outcome::Win(Mark::O)
        } else if board.is_full() {
            Outcome::Draw
        } else {
            Outcome::InProgress
        };
        assert_eq!(board.outcome(), expected, "\n{board}");

        if expected.is_terminal() {
            return 1;
        }

        let mark = board.next_mark();
        1 + board
            .empty_cells()
            .map(|pos| {
                let mut next = board;
                next.place(pos, mark);
                walk_all_games(next)
            })
            .sum::<usize>()
    }

    #[test]
    fn outcome_agrees_with_predicates_on_every_reachable_board() {
        assert_eq!(walk_all_games(Board::new()), 549_946);
    }

    #[test]
    fn parse_accepts_lowercase_and_empty_aliases() {
        assert_eq!(board("x-o_ .xo."), board("X.O...XO."));
        assert!("XXO".parse::<Board>().is_err());
        assert!("XX?OO....".parse::<Board>().is_err());
    }

    #[test]
    fn display_renders_three_rows() {
        assert_eq!(board("XX.OO....").to_string(), "XX.\nOO.\n...");
    }
}

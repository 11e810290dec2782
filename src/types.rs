use serde::{Deserialize, Serialize};

pub const CELL_EMPTY: u8 = 0;
pub const CELL_X: u8 = 1;
pub const CELL_O: u8 = 2;

const DEFAULT_AI_DELAY_MS: u32 = 500;

/// A player's mark. X always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    /// Wire code used by `Board::to_array` and `GameState`.
    pub fn code(self) -> u8 {
        match self {
            Self::X => CELL_X,
            Self::O => CELL_O,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            CELL_X => Some(Self::X),
            CELL_O => Some(Self::O),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::O => "O",
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of evaluating a board. Always derived from the board, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    InProgress,
    Win(Mark),
    Draw,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Per-session settings supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Mark played by the human; the computer takes the other one.
    pub human: Mark,
    /// Pause the UI should insert before triggering the AI move.
    /// The core only reports it.
    pub ai_delay_ms: u32,
}

impl SessionConfig {
    pub fn computer(&self) -> Mark {
        self.human.opponent()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            human: Mark::X,
            ai_delay_ms: DEFAULT_AI_DELAY_MS,
        }
    }
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    /// 9 cells in row-major order: 0=empty, 1=X, 2=O.
    pub board: Vec<u8>,
    pub current_player: u8,
    pub human_player: u8,
    pub is_game_over: bool,
    /// 0 while nobody has won.
    pub winner: u8,
    pub is_draw: bool,
    pub last_move: Option<u8>,
    /// Contract:
    /// - Win: the three indices of the first completed line.
    /// - Otherwise: empty.
    pub winning_line: Vec<u8>,
    pub status: String,
}

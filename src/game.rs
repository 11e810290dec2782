use crate::ai::search;
use crate::board::Board;
use crate::types::{GameState, Mark, Outcome, SessionConfig};

/// Source of computer moves.
pub trait MoveSelector: Send + Sync {
    fn select_move(&self, board: &Board, mark: Mark) -> Result<usize, String>;
}

/// Exact minimax; never loses.
#[derive(Debug, Default, Clone, Copy)]
pub struct MinimaxSelector;

impl MoveSelector for MinimaxSelector {
    fn select_move(&self, board: &Board, mark: Mark) -> Result<usize, String> {
        search::select_move(board, mark)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingHuman,
    AwaitingAi,
    Terminal(Outcome),
}

pub type Observer = Box<dyn FnMut(&GameState)>;

/// One game between a human and the computer.
///
/// The host decides when to call `do_ai_move` once the phase is
/// `AwaitingAi` (typically after `SessionConfig::ai_delay_ms`).
pub struct GameSession {
    board: Board,
    config: SessionConfig,
    phase: Phase,
    last_move: Option<usize>,
    selector: Box<dyn MoveSelector>,
    observer: Option<Observer>,
}

impl GameSession {
    pub fn new(config: SessionConfig, selector: Box<dyn MoveSelector>) -> Self {
        let board = Board::new();
        Self {
            phase: phase_for(&board, &config),
            board,
            config,
            last_move: None,
            selector,
            observer: None,
        }
    }

    pub fn new_with_default_selector(config: SessionConfig) -> Self {
        Self::new(config, Box::new(MinimaxSelector))
    }

    /// Starts from an arbitrary position. The mark to move is derived from
    /// the board, so `board` must be reachable by legal play.
    pub fn from_board(
        board: Board,
        config: SessionConfig,
        selector: Box<dyn MoveSelector>,
    ) -> Result<Self, String> {
        if !board.is_consistent() {
            return Err("board is not reachable by legal play".to_string());
        }

        let mut session = Self::new(config, selector);
        session.board = board;
        session.phase = phase_for(&board, &config);
        Ok(session)
    }

    /// Installs a hook called after every accepted move and every reset.
    pub fn set_observer(&mut self, observer: impl FnMut(&GameState) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Outcome {
        self.board.outcome()
    }

    pub fn last_move(&self) -> Option<usize> {
        self.last_move
    }

    pub fn is_ai_turn(&self) -> bool {
        self.phase == Phase::AwaitingAi
    }

    /// Human move. Returns `false` without touching the session when it is
    /// not the human's turn or `pos` is not an empty cell.
    pub fn place(&mut self, pos: usize) -> bool {
        if self.phase != Phase::AwaitingHuman {
            log::trace!("ignoring move {pos}: phase is {:?}", self.phase);
            return false;
        }
        if !self.board.place(pos, self.config.human) {
            log::trace!("ignoring move {pos}: cell unavailable");
            return false;
        }

        self.finish_move(pos);
        true
    }

    pub fn do_ai_move(&mut self) -> Result<(), String> {
        match self.phase {
            Phase::Terminal(_) => return Err("game is already over".to_string()),
            Phase::AwaitingHuman => return Err("it is not AI's turn".to_string()),
            Phase::AwaitingAi => {}
        }

        let mark = self.config.computer();
        let selected = self.selector.select_move(&self.board, mark)?;
        if !self.board.place(selected, mark) {
            return Err(format!("AI selected an unavailable cell: {selected}"));
        }

        log::debug!("AI ({mark}) played {selected}");
        self.finish_move(selected);
        Ok(())
    }

    /// Human move followed immediately by the AI reply, for hosts that do
    /// not delay the computer. Returns `Ok(false)` when the human move was
    /// ignored.
    pub fn play(&mut self, pos: usize) -> Result<bool, String> {
        if !self.place(pos) {
            return Ok(false);
        }
        if self.is_ai_turn() {
            self.do_ai_move()?;
        }
        Ok(true)
    }

    /// Clears the board. When the computer owns X it is its turn again.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.last_move = None;
        self.phase = phase_for(&self.board, &self.config);
        self.notify();
    }

    pub fn to_game_state(&self) -> GameState {
        let outcome = self.board.outcome();
        GameState {
            board: self.board.to_array().to_vec(),
            current_player: match self.phase {
                Phase::Terminal(_) => 0,
                _ => self.board.next_mark().code(),
            },
            human_player: self.config.human.code(),
            is_game_over: outcome.is_terminal(),
            winner: match outcome {
                Outcome::Win(mark) => mark.code(),
                _ => 0,
            },
            is_draw: outcome == Outcome::Draw,
            last_move: self.last_move.map(|pos| pos as u8),
            winning_line: self
                .board
                .winning_line()
                .map(|line| line.iter().map(|&pos| pos as u8).collect())
                .unwrap_or_default(),
            status: self.status_message(),
        }
    }

    fn status_message(&self) -> String {
        let human = self.config.human;
        match self.phase {
            Phase::Terminal(Outcome::Win(mark)) if mark == human => {
                format!("Player {mark} wins!")
            }
            Phase::Terminal(Outcome::Win(mark)) => format!("AI ({mark}) wins!"),
            Phase::Terminal(_) => "It's a draw!".to_string(),
            Phase::AwaitingHuman => format!("Player {human}'s turn"),
            Phase::AwaitingAi => format!("AI ({}) is thinking...", human.opponent()),
        }
    }

    fn finish_move(&mut self, pos: usize) {
        self.last_move = Some(pos);
        self.phase = phase_for(&self.board, &self.config);
        if let Phase::Terminal(outcome) = self.phase {
            log::info!("game over: {outcome:?}");
        }
        self.notify();
    }

    fn notify(&mut self) {
        if self.observer.is_none() {
            return;
        }
        let state = self.to_game_state();
        if let Some(observer) = self.observer.as_mut() {
            observer(&state);
        }
    }
}

fn phase_for(board: &Board, config: &SessionConfig) -> Phase {
    match board.outcome() {
        Outcome::InProgress if board.next_mark() == config.human => Phase::AwaitingHuman,
        Outcome::InProgress => Phase::AwaitingAi,
        outcome => Phase::Terminal(outcome),
    }
}

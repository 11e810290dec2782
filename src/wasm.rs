use wasm_bindgen::prelude::*;

use crate::ai::search;
use crate::board::Board;
use crate::game::{GameSession, MinimaxSelector};
use crate::types::{Mark, SessionConfig};

/// Handle owned by the JavaScript UI. One per game.
#[wasm_bindgen]
pub struct WasmGame(GameSession);

#[wasm_bindgen]
impl WasmGame {
    /// `config` may be `undefined`, `null` or a partial
    /// `{ human: "X" | "O", ai_delay_ms: number }` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmGame, JsValue> {
        let config = parse_config(config)?;
        Ok(Self(GameSession::new_with_default_selector(config)))
    }

    #[wasm_bindgen(js_name = "fromBoard")]
    pub fn from_board(cells: Vec<u8>, config: JsValue) -> Result<WasmGame, JsValue> {
        let config = parse_config(config)?;
        let board = Board::from_array(&cells).map_err(|e| JsValue::from_str(&e))?;
        GameSession::from_board(board, config, Box::new(MinimaxSelector))
            .map(Self)
            .map_err(|e| JsValue::from_str(&e))
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.0.to_game_state()).map_err(JsValue::from)
    }

    /// Human click. `false` means the click was ignored.
    pub fn place(&mut self, index: u32) -> bool {
        self.0.place(index as usize)
    }

    #[wasm_bindgen(js_name = "doAiMove")]
    pub fn do_ai_move(&mut self) -> Result<JsValue, JsValue> {
        self.0.do_ai_move().map_err(|e| JsValue::from_str(&e))?;
        self.state()
    }

    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        self.0.reset();
        self.state()
    }

    #[wasm_bindgen(js_name = "isAiTurn")]
    pub fn is_ai_turn(&self) -> bool {
        self.0.is_ai_turn()
    }

    #[wasm_bindgen(js_name = "aiDelayMs")]
    pub fn ai_delay_ms(&self) -> u32 {
        self.0.config().ai_delay_ms
    }
}

/// Best cell for `mark` (1=X, 2=O) on `cells`.
#[wasm_bindgen(js_name = "selectMove")]
pub fn select_move(cells: Vec<u8>, mark: u8) -> Result<u8, JsValue> {
    let mark = Mark::from_code(mark)
        .ok_or_else(|| JsValue::from_str(&format!("invalid mark value {mark}")))?;
    let board = Board::from_array(&cells).map_err(|e| JsValue::from_str(&e))?;
    search::select_move(&board, mark)
        .map(|pos| pos as u8)
        .map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

fn parse_config(config: JsValue) -> Result<SessionConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(SessionConfig::default());
    }
    serde_wasm_bindgen::from_value(config).map_err(JsValue::from)
}

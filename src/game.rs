use crate::board::{Board, Color, MoveRecord};
use crate::error::{GameError, Result};
use crate::movegen::{GameState, Move, MoveGenerator};
use crate::search::{Search, DEFAULT_DEPTH};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

const HELP: &str = "\
commands:
  e2e4    move a piece (from square, to square)
  moves   list legal moves
  undo    take back your last move
  help    show this text
  quit    leave the game";

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub engine: Color,
    pub depth: u32,
    /// Engine plays both sides.
    pub self_play: bool,
    pub max_plies: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            engine: Color::Black,
            depth: DEFAULT_DEPTH,
            self_play: false,
            max_plies: 200,
        }
    }
}

/// Applied moves, newest last.
#[derive(Debug, Clone, Default)]
pub struct MoveHistory {
    records: Vec<MoveRecord>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.records.iter().map(|record| record.mv)
    }

    /// Takes the newest move back off `board`.
    pub fn undo(&mut self, board: &mut Board) -> Option<Move> {
        let record = self.records.pop()?;
        board.undo(&record);
        Some(record.mv)
    }
}

pub struct Game {
    board: Board,
    turn: Color,
    config: GameConfig,
    history: MoveHistory,
    move_generator: MoveGenerator,
    search: Search,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Game {
            board: Board::new(),
            turn: Color::White,
            search: Search::with_depth(config.depth),
            config,
            history: MoveHistory::new(),
            move_generator: MoveGenerator::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    pub fn state(&self) -> GameState {
        self.move_generator.game_state(&self.board, self.turn)
    }

    pub fn is_engine_turn(&self) -> bool {
        self.config.self_play || self.turn == self.config.engine
    }

    pub fn game_over_message(&self) -> Option<String> {
        match self.state() {
            GameState::Ongoing => None,
            GameState::Checkmate(winner) => Some(format!("{} wins by checkmate!", winner)),
            GameState::Stalemate => Some("Stalemate! Draw.".to_string()),
        }
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut reader = stdin.lock();
        let mut line = String::new();
        let mut plies = 0;

        loop {
            writeln!(stdout, "{}", self.board)?;

            if let Some(message) = self.game_over_message() {
                info!(%message, "game over");
                writeln!(stdout, "{}", message)?;
                break;
            }

            if self.is_engine_turn() {
                match self.engine_turn(plies) {
                    Some(response) => {
                        writeln!(stdout, "{}", response)?;
                        plies += 1;
                    }
                    None => {
                        writeln!(stdout, "Stopping after {} plies.", plies)?;
                        break;
                    }
                }
                continue;
            }

            write!(stdout, "{} to move (e.g. e2e4): ", self.turn)?;
            stdout.flush()?;

            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }

            let command = line.trim();
            if command == "quit" {
                break;
            }

            match self.handle_command(command) {
                Ok(response) => {
                    if !response.is_empty() {
                        writeln!(stdout, "{}", response)?;
                    }
                }
                Err(err) => {
                    warn!(%err, command, "rejected input");
                    writeln!(stdout, "{}", err)?;
                }
            }
            stdout.flush()?;
        }
        Ok(())
    }

    /// One line of human input on the human's turn.
    pub fn handle_command(&mut self, command: &str) -> Result<String> {
        match command.trim() {
            "" => Ok(String::new()),
            "help" => Ok(HELP.to_string()),
            "moves" => Ok(self.handle_moves()),
            "undo" => self.handle_undo(),
            // Four characters, or anything with a digit in it, is meant as a move.
            input if input.chars().count() == 4 || input.chars().any(|c| c.is_ascii_digit()) => {
                let mv: Move = input.parse()?;
                self.play_human_move(mv)
            }
            input => Err(GameError::UnknownCommand(input.to_string())),
        }
    }

    fn handle_moves(&self) -> String {
        self.move_generator
            .generate_moves(&self.board, self.turn, true)
            .iter()
            .map(|mv| mv.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn handle_undo(&mut self) -> Result<String> {
        // Back to the human's turn: the engine's reply and the human move before it.
        let count = if self.turn == self.config.engine { 1 } else { 2 };
        if self.config.self_play || self.history.len() < count {
            return Err(GameError::NothingToUndo);
        }

        let mut undone = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(mv) = self.history.undo(&mut self.board) {
                self.turn = self.turn.opposite();
                undone.push(mv.to_string());
            }
        }
        info!(moves = ?undone, "undo");
        Ok(format!("Took back {}.", undone.join(" ")))
    }

    pub fn play_human_move(&mut self, mv: Move) -> Result<String> {
        if self.state() != GameState::Ongoing {
            return Err(GameError::GameOver);
        }
        if !self.move_generator.is_move_legal(&self.board, self.turn, &mv) {
            return Err(GameError::IllegalMove(mv));
        }
        Ok(self.apply_move(mv))
    }

    /// One engine turn of `run`, `plies` being the engine moves played so far.
    /// `None` once self-play has reached its ply limit.
    pub fn engine_turn(&mut self, plies: usize) -> Option<String> {
        if self.config.self_play && plies >= self.config.max_plies {
            return None;
        }
        let side = self.turn;
        let response = self.play_engine_move();
        Some(format!("{} is thinking ...\n{}", side, response))
    }

    /// Engine picks and plays a move for the side to move. With nothing
    /// legal the turn simply passes.
    pub fn play_engine_move(&mut self) -> String {
        let side = self.turn;
        match self.search.best_move(&self.board, side) {
            Some(mv) => {
                let mut response = format!("{} plays: {}", side, mv);
                let check = self.apply_move(mv);
                if !check.is_empty() {
                    response.push('\n');
                    response.push_str(&check);
                }
                response
            }
            None => {
                self.turn = side.opposite();
                format!("{} has no move.", side)
            }
        }
    }

    /// Applies a move already known to be legal, then reports check on the
    /// side now to move.
    fn apply_move(&mut self, mv: Move) -> String {
        let record = self.board.apply(mv);
        self.history.push(record);
        info!(side = %self.turn, %mv, "move applied");

        self.turn = self.turn.opposite();
        if self.move_generator.is_in_check(&self.board, self.turn) {
            format!("{} is in check!", self.turn)
        } else {
            String::new()
        }
    }
}

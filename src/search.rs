use crate::board::{Board, Color};
use crate::evaluation::Evaluator;
use crate::movegen::{Move, MoveGenerator};
use tracing::{debug, trace};

pub const DEFAULT_DEPTH: u32 = 3;

/// Root window. Wider than any reachable material score.
pub const ALPHA_BOUND: i32 = -10_000;
pub const BETA_BOUND: i32 = 10_000;

pub struct Search {
    evaluator: Evaluator,
    move_generator: MoveGenerator,
    max_depth: u32,
    nodes_searched: u64,
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

impl Search {
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_DEPTH)
    }

    pub fn with_depth(max_depth: u32) -> Self {
        Self {
            evaluator: Evaluator::new(),
            move_generator: MoveGenerator::new(),
            max_depth,
            nodes_searched: 0,
        }
    }

    /// Best move for `side`, or `Move::NONE` when it has no legal move.
    pub fn find_best_move(&mut self, board: &Board, side: Color) -> Move {
        self.best_move(board, side).unwrap_or(Move::NONE)
    }

    /// White keeps the highest score, Black the lowest. Ties go to the
    /// first move in generation order.
    pub fn best_move(&mut self, board: &Board, side: Color) -> Option<Move> {
        self.nodes_searched = 0;

        let moves = self.move_generator.generate_moves(board, side, true);
        let maximizing = side == Color::White;

        let mut best: Option<(Move, i32)> = None;
        for mv in moves {
            // The child is searched with the root's own maximizing flag.
            let score = self.search(
                &board.with_move(mv),
                self.max_depth,
                maximizing,
                ALPHA_BOUND,
                BETA_BOUND,
            );
            debug!(%mv, score, "root move");

            let improves = match best {
                None => true,
                Some((_, best_score)) if maximizing => score > best_score,
                Some((_, best_score)) => score < best_score,
            };
            if improves {
                best = Some((mv, score));
            }
        }

        match best {
            Some((mv, score)) => {
                debug!(%side, %mv, score, nodes = self.nodes_searched, "best move");
                Some(mv)
            }
            None => {
                debug!(%side, "no legal moves");
                None
            }
        }
    }

    /// Minimax with alpha-beta pruning. White maximizes. Both the depth
    /// horizon and a side with no legal moves return the static evaluation.
    pub fn search(
        &mut self,
        board: &Board,
        depth: u32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes_searched += 1;

        if depth == 0 {
            return self.evaluator.evaluate(board);
        }

        let side = if maximizing { Color::White } else { Color::Black };
        let moves = self.move_generator.generate_moves(board, side, true);
        if moves.is_empty() {
            return self.evaluator.evaluate(board);
        }

        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        for mv in moves {
            let score = self.search(&board.with_move(mv), depth - 1, !maximizing, alpha, beta);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }

            if beta <= alpha {
                trace!(depth, alpha, beta, "cutoff");
                break;
            }
        }

        best
    }

    pub fn set_max_depth(&mut self, depth: u32) {
        self.max_depth = depth;
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn get_nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

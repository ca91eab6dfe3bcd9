use std::fmt;
use std::str::FromStr;

use crate::board::{Board, Color, Piece, BOARD_SIZE};
use crate::error::MoveParseError;

/// Source and destination squares as (column, row), 0-indexed.
/// What moves and what gets captured is read off the board when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from_x: u8,
    pub from_y: u8,
    pub to_x: u8,
    pub to_y: u8,
}

impl Move {
    /// "No move". Never generated, since a piece cannot move onto its own square.
    pub const NONE: Move = Move {
        from_x: 0,
        from_y: 0,
        to_x: 0,
        to_y: 0,
    };

    pub fn new(from_x: u8, from_y: u8, to_x: u8, to_y: u8) -> Self {
        Self {
            from_x,
            from_y,
            to_x,
            to_y,
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Move::NONE
    }

    fn from_coords(from: (usize, usize), to: (usize, usize)) -> Self {
        Self::new(from.0 as u8, from.1 as u8, to.0 as u8, to.1 as u8)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_none() {
            return write!(f, "0000");
        }
        let square = |x: u8, y: u8| format!("{}{}", (b'a' + x) as char, BOARD_SIZE as u8 - y);
        write!(
            f,
            "{}{}",
            square(self.from_x, self.from_y),
            square(self.to_x, self.to_y)
        )
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    /// Coordinate notation: `e2e4`. Rank 8 is row 0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != 4 {
            return Err(MoveParseError::Length(chars.len()));
        }

        let file = |c: char| match c {
            'a'..='h' => Ok(c as u8 - b'a'),
            _ => Err(MoveParseError::File(c)),
        };
        let rank = |c: char| match c {
            '1'..='8' => Ok(BOARD_SIZE as u8 - (c as u8 - b'0')),
            _ => Err(MoveParseError::Rank(c)),
        };

        Ok(Move::new(
            file(chars[0])?,
            rank(chars[1])?,
            file(chars[2])?,
            rank(chars[3])?,
        ))
    }
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (-1, 2), (-2, 1),
    (1, -2), (2, -1), (-1, -2), (-2, -1),
];

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// Square reached by stepping (dx, dy) from (x, y), if it is on the board.
fn step(x: usize, y: usize, dx: i8, dy: i8) -> Option<(usize, usize)> {
    let nx = x as i8 + dx;
    let ny = y as i8 + dy;
    let range = 0..BOARD_SIZE as i8;
    if range.contains(&nx) && range.contains(&ny) {
        Some((nx as usize, ny as usize))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Ongoing,
    Checkmate(Color), // Color is the winner
    Stalemate,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Moves for `side`, scanning squares row by row. With `filter_check` set,
    /// moves that leave `side`'s own king attacked are dropped.
    pub fn generate_moves(&self, board: &Board, side: Color, filter_check: bool) -> Vec<Move> {
        let moves = self.pseudo_legal_moves(board, side);
        if !filter_check {
            return moves;
        }

        moves
            .into_iter()
            .filter(|&mv| !self.is_in_check(&board.with_move(mv), side))
            .collect()
    }

    fn pseudo_legal_moves(&self, board: &Board, side: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let Some(cell) = board.get(x, y) else {
                    continue;
                };
                if cell.color != side {
                    continue;
                }

                match cell.piece {
                    Piece::Pawn => self.pawn_moves(board, x, y, side, &mut moves),
                    Piece::Knight => {
                        for &(dx, dy) in &KNIGHT_OFFSETS {
                            self.push_step(board, x, y, dx, dy, side, &mut moves);
                        }
                    }
                    Piece::King => {
                        for dx in -1..=1 {
                            for dy in -1..=1 {
                                if dx != 0 || dy != 0 {
                                    self.push_step(board, x, y, dx, dy, side, &mut moves);
                                }
                            }
                        }
                    }
                    Piece::Rook => self.slide(board, x, y, &ROOK_DIRECTIONS, side, &mut moves),
                    Piece::Bishop => self.slide(board, x, y, &BISHOP_DIRECTIONS, side, &mut moves),
                    Piece::Queen => {
                        self.slide(board, x, y, &ROOK_DIRECTIONS, side, &mut moves);
                        self.slide(board, x, y, &BISHOP_DIRECTIONS, side, &mut moves);
                    }
                }
            }
        }
        moves
    }

    fn pawn_moves(&self, board: &Board, x: usize, y: usize, side: Color, moves: &mut Vec<Move>) {
        let dir = side.forward();
        let Some((_, ny)) = step(x, y, 0, dir) else {
            return;
        };

        // Single push
        if board.get(x, ny).is_none() {
            moves.push(Move::from_coords((x, y), (x, ny)));
        }

        // Double push from the starting row, both squares empty
        if y == side.pawn_start_row() {
            if let Some((_, jump_y)) = step(x, y, 0, 2 * dir) {
                if board.get(x, ny).is_none() && board.get(x, jump_y).is_none() {
                    moves.push(Move::from_coords((x, y), (x, jump_y)));
                }
            }
        }

        // Diagonal captures
        for dx in [-1, 1] {
            if let Some((nx, ny)) = step(x, y, dx, dir) {
                if matches!(board.color_at(nx, ny), Some(color) if color != side) {
                    moves.push(Move::from_coords((x, y), (nx, ny)));
                }
            }
        }
    }

    /// Single-step move for knights and kings: empty or enemy destination.
    #[allow(clippy::too_many_arguments)]
    fn push_step(
        &self,
        board: &Board,
        x: usize,
        y: usize,
        dx: i8,
        dy: i8,
        side: Color,
        moves: &mut Vec<Move>,
    ) {
        if let Some((nx, ny)) = step(x, y, dx, dy) {
            if board.color_at(nx, ny) != Some(side) {
                moves.push(Move::from_coords((x, y), (nx, ny)));
            }
        }
    }

    fn slide(
        &self,
        board: &Board,
        x: usize,
        y: usize,
        directions: &[(i8, i8)],
        side: Color,
        moves: &mut Vec<Move>,
    ) {
        for &(dx, dy) in directions {
            let (mut cx, mut cy) = (x, y);
            while let Some((nx, ny)) = step(cx, cy, dx, dy) {
                match board.color_at(nx, ny) {
                    Some(color) if color == side => break,
                    Some(_) => {
                        moves.push(Move::from_coords((x, y), (nx, ny)));
                        break;
                    }
                    None => moves.push(Move::from_coords((x, y), (nx, ny))),
                }
                cx = nx;
                cy = ny;
            }
        }
    }

    /// Whether any pseudo-legal enemy move lands on `color`'s king.
    /// A board without that king counts as check.
    pub fn is_in_check(&self, board: &Board, color: Color) -> bool {
        let Some((king_x, king_y)) = board.find_king(color) else {
            return true;
        };

        self.pseudo_legal_moves(board, color.opposite())
            .iter()
            .any(|mv| mv.to_x as usize == king_x && mv.to_y as usize == king_y)
    }

    pub fn is_move_legal(&self, board: &Board, side: Color, mv: &Move) -> bool {
        self.generate_moves(board, side, true).contains(mv)
    }

    pub fn game_state(&self, board: &Board, side: Color) -> GameState {
        if !self.generate_moves(board, side, true).is_empty() {
            return GameState::Ongoing;
        }

        if self.is_in_check(board, side) {
            GameState::Checkmate(side.opposite())
        } else {
            GameState::Stalemate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;

    fn place(board: &mut Board, square: &str, piece: Piece, color: Color) {
        let mv: Move = format!("{0}{0}", square).parse().unwrap();
        board.set(mv.from_x as usize, mv.from_y as usize, Some(Cell::new(piece, color)));
    }

    fn targets(moves: &[Move]) -> Vec<String> {
        moves.iter().map(|mv| mv.to_string()[2..].to_string()).collect()
    }

    #[test]
    fn parse_and_format() {
        let mv: Move = "e2e4".parse().unwrap();
        assert_eq!(mv, Move::new(4, 6, 4, 4));
        assert_eq!(mv.to_string(), "e2e4");
        assert_eq!("a8h1".parse::<Move>().unwrap(), Move::new(0, 0, 7, 7));
        assert_eq!(Move::NONE.to_string(), "0000");
    }

    #[test]
    fn parse_errors() {
        assert_eq!("e2e".parse::<Move>(), Err(MoveParseError::Length(3)));
        assert_eq!("i2e4".parse::<Move>(), Err(MoveParseError::File('i')));
        assert_eq!("e9e4".parse::<Move>(), Err(MoveParseError::Rank('9')));
        assert_eq!("e2e0".parse::<Move>(), Err(MoveParseError::Rank('0')));
    }

    #[test]
    fn initial_order_is_row_major() {
        let generator = MoveGenerator::new();
        let moves = generator.generate_moves(&Board::new(), Color::White, true);
        let text: Vec<String> = moves.iter().map(|mv| mv.to_string()).collect();
        assert_eq!(&text[..4], &["a2a3", "a2a4", "b2b3", "b2b4"]);
        assert_eq!(&text[16..], &["b1c3", "b1a3", "g1h3", "g1f3"]);
    }

    #[test]
    fn black_pawns_move_down() {
        let generator = MoveGenerator::new();
        let moves = generator.generate_moves(&Board::new(), Color::Black, true);
        assert_eq!(moves.len(), 20);
        assert_eq!(moves[0].to_string(), "b8c6");
        assert!(moves.contains(&"e7e5".parse::<Move>().unwrap()));
    }

    #[test]
    fn pawn_blocked_and_captures() {
        let mut board = Board::empty();
        place(&mut board, "d2", Piece::Pawn, Color::White);
        place(&mut board, "d4", Piece::Knight, Color::Black);
        place(&mut board, "c3", Piece::Rook, Color::Black);
        place(&mut board, "e3", Piece::Rook, Color::White);

        let generator = MoveGenerator::new();
        let moves = generator.generate_moves(&board, Color::White, false);
        let pawn: Vec<Move> = moves
            .into_iter()
            .filter(|mv| mv.from_x == 3 && mv.from_y == 6)
            .collect();
        // Double push blocked at d4, e3 is friendly
        assert_eq!(targets(&pawn), ["d3", "c3"]);
    }

    #[test]
    fn double_push_needs_empty_intermediate() {
        let mut board = Board::empty();
        place(&mut board, "a7", Piece::Pawn, Color::Black);
        place(&mut board, "a6", Piece::Pawn, Color::White);

        let generator = MoveGenerator::new();
        assert!(generator.generate_moves(&board, Color::Black, false).is_empty());
    }

    #[test]
    fn pawn_on_last_row_has_no_moves() {
        let mut board = Board::empty();
        place(&mut board, "c8", Piece::Pawn, Color::White);
        let generator = MoveGenerator::new();
        assert!(generator.generate_moves(&board, Color::White, false).is_empty());
    }

    #[test]
    fn knight_in_corner() {
        let mut board = Board::empty();
        place(&mut board, "a1", Piece::Knight, Color::White);
        place(&mut board, "b3", Piece::Pawn, Color::White);
        place(&mut board, "c2", Piece::Pawn, Color::Black);

        let generator = MoveGenerator::new();
        let moves: Vec<Move> = generator
            .generate_moves(&board, Color::White, false)
            .into_iter()
            .filter(|mv| mv.from_x == 0 && mv.from_y == 7)
            .collect();
        assert_eq!(targets(&moves), ["c2"]);
    }

    #[test]
    fn king_step_order() {
        let mut board = Board::empty();
        place(&mut board, "e4", Piece::King, Color::White);
        let generator = MoveGenerator::new();
        let moves = generator.generate_moves(&board, Color::White, false);
        assert_eq!(
            targets(&moves),
            ["d5", "d4", "d3", "e5", "e3", "f5", "f4", "f3"]
        );
    }

    #[test]
    fn rook_slides_stop_at_blockers() {
        let mut board = Board::empty();
        place(&mut board, "d4", Piece::Rook, Color::White);
        place(&mut board, "d2", Piece::Pawn, Color::Black);
        place(&mut board, "f4", Piece::Pawn, Color::White);

        let generator = MoveGenerator::new();
        let moves = generator.generate_moves(&board, Color::White, false);
        let rook: Vec<Move> = moves.into_iter().filter(|mv| mv.from_x == 3).collect();
        assert_eq!(
            targets(&rook),
            ["d3", "d2", "e4", "d5", "d6", "d7", "d8", "c4", "b4", "a4"]
        );
    }

    #[test]
    fn queen_covers_both_direction_sets() {
        let mut board = Board::empty();
        place(&mut board, "d4", Piece::Queen, Color::Black);
        let generator = MoveGenerator::new();
        assert_eq!(generator.generate_moves(&board, Color::Black, false).len(), 27);
    }

    #[test]
    fn check_detection() {
        let mut board = Board::empty();
        place(&mut board, "e1", Piece::King, Color::White);
        place(&mut board, "e8", Piece::Rook, Color::Black);
        let generator = MoveGenerator::new();
        assert!(generator.is_in_check(&board, Color::White));

        place(&mut board, "e4", Piece::Bishop, Color::White);
        assert!(!generator.is_in_check(&board, Color::White));
    }

    #[test]
    fn pawn_push_is_not_an_attack() {
        let mut board = Board::empty();
        place(&mut board, "e1", Piece::King, Color::White);
        place(&mut board, "e2", Piece::Pawn, Color::Black);
        let generator = MoveGenerator::new();
        assert!(!generator.is_in_check(&board, Color::White));

        place(&mut board, "e2", Piece::Knight, Color::Black);
        place(&mut board, "d2", Piece::Pawn, Color::Black);
        assert!(generator.is_in_check(&board, Color::White));
    }

    #[test]
    fn missing_king_counts_as_check() {
        let generator = MoveGenerator::new();
        assert!(generator.is_in_check(&Board::empty(), Color::Black));
    }

    #[test]
    fn pinned_piece_cannot_move() {
        let mut board = Board::empty();
        place(&mut board, "e1", Piece::King, Color::White);
        place(&mut board, "e2", Piece::Knight, Color::White);
        place(&mut board, "e8", Piece::Rook, Color::Black);
        place(&mut board, "a8", Piece::King, Color::Black);

        let generator = MoveGenerator::new();
        let legal = generator.generate_moves(&board, Color::White, true);
        assert!(legal.iter().all(|mv| mv.from_y == 7));
        assert!(!generator.is_move_legal(&board, Color::White, &"e2c3".parse().unwrap()));
    }

    #[test]
    fn back_rank_mate_and_stalemate() {
        let generator = MoveGenerator::new();

        let mut mate = Board::empty();
        place(&mut mate, "g8", Piece::King, Color::Black);
        place(&mut mate, "f7", Piece::Pawn, Color::Black);
        place(&mut mate, "g7", Piece::Pawn, Color::Black);
        place(&mut mate, "h7", Piece::Pawn, Color::Black);
        place(&mut mate, "a8", Piece::Rook, Color::White);
        place(&mut mate, "g1", Piece::King, Color::White);
        assert_eq!(
            generator.game_state(&mate, Color::Black),
            GameState::Checkmate(Color::White)
        );

        let mut stale = Board::empty();
        place(&mut stale, "a8", Piece::King, Color::Black);
        place(&mut stale, "b6", Piece::Queen, Color::White);
        place(&mut stale, "h1", Piece::King, Color::White);
        assert_eq!(generator.game_state(&stale, Color::Black), GameState::Stalemate);
        assert_eq!(generator.game_state(&stale, Color::White), GameState::Ongoing);
    }
}

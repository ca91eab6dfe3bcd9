use crate::board::{Board, Color, Piece};

/// Material-only evaluation. Positive favours White.
#[derive(Debug, Clone)]
pub struct Evaluator {
    pub pawn_value: i32,
    pub knight_value: i32,
    pub bishop_value: i32,
    pub rook_value: i32,
    pub queen_value: i32,
    pub king_value: i32,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            pawn_value: 10,
            knight_value: 30,
            bishop_value: 30,
            rook_value: 50,
            queen_value: 90,
            king_value: 900,
        }
    }

    pub fn evaluate(&self, board: &Board) -> i32 {
        board
            .pieces()
            .map(|(_, _, cell)| {
                let value = self.piece_value(cell.piece);
                if cell.color == Color::White { value } else { -value }
            })
            .sum()
    }

    pub fn piece_value(&self, piece: Piece) -> i32 {
        match piece {
            Piece::Pawn => self.pawn_value,
            Piece::Knight => self.knight_value,
            Piece::Bishop => self.bishop_value,
            Piece::Rook => self.rook_value,
            Piece::Queen => self.queen_value,
            Piece::King => self.king_value,
        }
    }
}

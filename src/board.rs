use std::fmt;
use crate::movegen::Move;

pub const BOARD_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl Piece {
    fn symbol(&self) -> char {
        match self {
            Piece::Pawn => 'P',
            Piece::Rook => 'R',
            Piece::Knight => 'N',
            Piece::Bishop => 'B',
            Piece::Queen => 'Q',
            Piece::King => 'K',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row step a pawn of this color advances by.
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn pawn_start_row(&self) -> usize {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// An occupied square. Empty squares are `None` in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub piece: Piece,
    pub color: Color,
}

impl Cell {
    pub fn new(piece: Piece, color: Color) -> Self {
        Self { piece, color }
    }

    /// Uppercase for White, lowercase for Black.
    pub fn symbol(&self) -> char {
        let s = self.piece.symbol();
        match self.color {
            Color::White => s,
            Color::Black => s.to_ascii_lowercase(),
        }
    }
}

/// Everything needed to take a move back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub mv: Move,
    pub moved: Option<Cell>,
    pub captured: Option<Cell>,
}

/// Row 0 is Black's back rank, row 7 is White's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub squares: [[Option<Cell>; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        const BACK_RANK: [Piece; BOARD_SIZE] = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];

        let mut board = Self::empty();
        for (x, &piece) in BACK_RANK.iter().enumerate() {
            board.squares[0][x] = Some(Cell::new(piece, Color::Black));
            board.squares[1][x] = Some(Cell::new(Piece::Pawn, Color::Black));
            board.squares[6][x] = Some(Cell::new(Piece::Pawn, Color::White));
            board.squares[7][x] = Some(Cell::new(piece, Color::White));
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            squares: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.squares[y][x]
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Option<Cell>) {
        self.squares[y][x] = cell;
    }

    pub fn color_at(&self, x: usize, y: usize) -> Option<Color> {
        self.squares[y][x].map(|cell| cell.color)
    }

    /// Last king of `color` in row-major order, as (x, y).
    pub fn find_king(&self, color: Color) -> Option<(usize, usize)> {
        let mut king = None;
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                if self.squares[y][x] == Some(Cell::new(Piece::King, color)) {
                    king = Some((x, y));
                }
            }
        }
        king
    }

    pub fn pieces(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.squares.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, cell)| cell.map(|cell| (x, y, cell)))
        })
    }

    /// Relocates the source cell to the destination. A pawn landing on
    /// either back rank becomes a queen of its own color.
    pub fn make_move(&mut self, mv: Move) {
        let (fx, fy) = (mv.from_x as usize, mv.from_y as usize);
        let (tx, ty) = (mv.to_x as usize, mv.to_y as usize);

        let moving = self.squares[fy][fx];
        self.squares[ty][tx] = match moving {
            Some(cell) if cell.piece == Piece::Pawn && (ty == 0 || ty == BOARD_SIZE - 1) => {
                Some(Cell::new(Piece::Queen, cell.color))
            }
            other => other,
        };
        self.squares[fy][fx] = None;
    }

    /// Like `make_move`, but returns what `undo` needs to restore the board.
    pub fn apply(&mut self, mv: Move) -> MoveRecord {
        let record = MoveRecord {
            mv,
            moved: self.get(mv.from_x as usize, mv.from_y as usize),
            captured: self.get(mv.to_x as usize, mv.to_y as usize),
        };
        self.make_move(mv);
        record
    }

    pub fn undo(&mut self, record: &MoveRecord) {
        let mv = record.mv;
        self.set(mv.from_x as usize, mv.from_y as usize, record.moved);
        self.set(mv.to_x as usize, mv.to_y as usize, record.captured);
    }

    /// Copy of the board with the move applied.
    pub fn with_move(&self, mv: Move) -> Board {
        let mut board = self.clone();
        board.make_move(mv);
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for (y, row) in self.squares.iter().enumerate() {
            let rank = BOARD_SIZE - y;
            write!(f, "{} ", rank)?;
            for cell in row {
                let symbol = cell.map(|cell| cell.symbol()).unwrap_or('.');
                write!(f, "{} ", symbol)?;
            }
            writeln!(f, "{}", rank)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

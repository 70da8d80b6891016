use std::fmt;

use crate::error::GameError;

use super::Player;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
pub const CELL_COUNT: usize = ROWS * COLS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Occupied(Player),
}

impl Cell {
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Occupied(player) => player.symbol(),
        }
    }
}

/// One of the eight compass steps on the grid. Row 0 is the top, so `S`
/// walks toward the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// (row, column) offset of a single step
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::N => (-1, 0),
            Direction::NE => (-1, 1),
            Direction::E => (0, 1),
            Direction::SE => (1, 1),
            Direction::S => (1, 0),
            Direction::SW => (1, -1),
            Direction::W => (0, -1),
            Direction::NW => (-1, -1),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::N => Direction::S,
            Direction::NE => Direction::SW,
            Direction::E => Direction::W,
            Direction::SE => Direction::NW,
            Direction::S => Direction::N,
            Direction::SW => Direction::NE,
            Direction::W => Direction::E,
            Direction::NW => Direction::SE,
        }
    }
}

/// A line orientation along which four in a row can form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
    DiagonalDownRight,
    DiagonalDownLeft,
}

impl Axis {
    pub const ALL: [Axis; 4] = [
        Axis::Row,
        Axis::Column,
        Axis::DiagonalDownRight,
        Axis::DiagonalDownLeft,
    ];

    /// Direction in which lines along this axis are read.
    pub fn direction(self) -> Direction {
        match self {
            Axis::Row => Direction::E,
            Axis::Column => Direction::S,
            Axis::DiagonalDownRight => Direction::SE,
            Axis::DiagonalDownLeft => Direction::SW,
        }
    }

    /// The maximal in-bounds line along this axis passing through `pos`,
    /// ordered in the axis reading direction.
    pub fn line_through(self, pos: Position) -> Vec<Position> {
        let forward = self.direction();
        let mut line: Vec<Position> = pos.ray(forward.opposite(), ROWS.max(COLS)).collect();
        line.reverse();
        line.push(pos);
        line.extend(pos.ray(forward, ROWS.max(COLS)));
        line
    }
}

/// A cell coordinate, guaranteed to lie on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    row: usize,
    col: usize,
}

impl Position {
    /// Returns `None` if (row, col) is off the board
    pub fn new(row: usize, col: usize) -> Option<Position> {
        (row < ROWS && col < COLS).then_some(Position { row, col })
    }

    pub fn row(self) -> usize {
        self.row
    }

    pub fn col(self) -> usize {
        self.col
    }

    fn index(self) -> usize {
        self.row * COLS + self.col
    }

    fn from_index(index: usize) -> Position {
        Position {
            row: index / COLS,
            col: index % COLS,
        }
    }

    /// The adjacent cell in `dir`, if it is on the board
    pub fn neighbor(self, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Position::new(row, col)
    }

    /// Walk up to `max_len` steps in `dir`, not including `self`. Stops early
    /// at the board edge.
    pub fn ray(self, dir: Direction, max_len: usize) -> impl Iterator<Item = Position> {
        std::iter::successors(self.neighbor(dir), move |p| p.neighbor(dir)).take(max_len)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The 6x7 grid, stored row-major. Row 0 is the top, row 5 is the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
    move_count: usize,
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [Cell::Empty; CELL_COUNT],
            move_count: 0,
        }
    }

    /// Parse a board from six rows of text, top row first. `.` is empty,
    /// `X` is the first player and `O` the second.
    pub fn from_rows(rows: &[&str; ROWS]) -> Result<Self, GameError> {
        let mut board = Board::new();
        for (row, text) in rows.iter().enumerate() {
            let symbols: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
            if symbols.len() != COLS {
                return Err(GameError::MalformedBoard(format!(
                    "row {row} has {} cells, expected {COLS}",
                    symbols.len()
                )));
            }
            for (col, symbol) in symbols.into_iter().enumerate() {
                let cell = match symbol {
                    '.' => Cell::Empty,
                    'X' | 'x' => Cell::Occupied(Player::First),
                    'O' | 'o' => Cell::Occupied(Player::Second),
                    other => {
                        return Err(GameError::MalformedBoard(format!(
                            "unexpected '{other}' at row {row}, column {col}"
                        )))
                    }
                };
                board.cells[row * COLS + col] = cell;
            }
        }

        // Gravity: nothing may rest on an empty cell.
        for index in 0..CELL_COUNT - COLS {
            if !board.cells[index].is_empty() && board.cells[index + COLS].is_empty() {
                return Err(GameError::InvalidPlacement(Position::from_index(index)));
            }
        }

        board.move_count = board.cells.iter().filter(|c| !c.is_empty()).count();
        Ok(board)
    }

    /// Get the cell at a specific row and column
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * COLS + col]
    }

    pub fn occupant(&self, pos: Position) -> Cell {
        self.cells[pos.index()]
    }

    /// Number of pieces placed since the board was created or cleared
    pub fn move_count(&self) -> usize {
        self.move_count
    }

    /// Check if a column is full. Columns off the board count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= COLS {
            return true;
        }
        !self.cells[col].is_empty()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.move_count == CELL_COUNT
    }

    /// Columns that can still take a piece
    pub fn legal_columns(&self) -> Vec<usize> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// The cell a piece dropped into `col` lands on, or `None` if the
    /// column is full.
    pub fn drop_target(&self, col: usize) -> Result<Option<Position>, GameError> {
        if col >= COLS {
            return Err(GameError::OutOfRange(col));
        }

        Ok((0..ROWS)
            .rev()
            .map(|row| Position { row, col })
            .find(|&pos| self.occupant(pos).is_empty()))
    }

    /// Whether `pos` is where a piece dropped into its column would land now
    pub fn is_playable(&self, pos: Position) -> bool {
        matches!(self.drop_target(pos.col), Ok(Some(target)) if target == pos)
    }

    /// Occupy `pos` for `player`. `pos` must be the current drop target of
    /// its column.
    pub fn place(&mut self, pos: Position, player: Player) -> Result<(), GameError> {
        if !self.is_playable(pos) {
            return Err(GameError::InvalidPlacement(pos));
        }
        self.cells[pos.index()] = Cell::Occupied(player);
        self.move_count += 1;
        Ok(())
    }

    /// Number of occupied cells in `col`
    pub fn column_height(&self, col: usize) -> usize {
        (0..ROWS)
            .filter(|&row| !self.get(row, col).is_empty())
            .count()
    }

    pub fn tallest_column_height(&self) -> usize {
        (0..COLS)
            .map(|col| self.column_height(col))
            .max()
            .unwrap_or(0)
    }

    /// Reset every cell to empty and the move count to zero
    pub fn clear(&mut self) {
        self.cells = [Cell::Empty; CELL_COUNT];
        self.move_count = 0;
    }

    /// Copy of the grid, indexed `[row][col]`, for rendering
    pub fn snapshot(&self) -> [[Cell; COLS]; ROWS] {
        let mut grid = [[Cell::Empty; COLS]; ROWS];
        for (index, cell) in self.cells.iter().enumerate() {
            grid[index / COLS][index % COLS] = *cell;
        }
        grid
    }

    /// All positions occupied by `player`, top row first
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, cell)| cell.player() == Some(player))
            .map(|(index, _)| Position::from_index(index))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            let line: String = (0..COLS).map(|col| self.get(row, col).symbol()).collect();
            if row + 1 < ROWS {
                writeln!(f, "{line}")?;
            } else {
                write!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

//! Grid model
//!
//! A maze is a 4×4 block of rooms. Each room is empty or holds one obstacle
//! from the maze's alphabet: diagonal walls (`/`, `\`) for wall mazes, or
//! one-way arrows (`U`, `D`, `L`, `R`) for arrow mazes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::GRID_SIZE;
use crate::error::EngineError;

/// Direction the mouse is travelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row, col) step taken when moving one room this way
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Stable index 0..4, used for visited-state bitsets
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

/// Orientation of a diagonal wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wall {
    /// `/`
    Forward,
    /// `\`
    Backward,
}

impl Wall {
    /// Bounce a travelling mouse off this wall.
    ///
    /// `/` pairs R↔U and L↔D; `\` pairs R↔D and L↔U. Each is its own inverse.
    pub fn reflect(self, dir: Direction) -> Direction {
        use Direction::*;
        match (self, dir) {
            (Wall::Forward, Right) => Up,
            (Wall::Forward, Up) => Right,
            (Wall::Forward, Left) => Down,
            (Wall::Forward, Down) => Left,
            (Wall::Backward, Right) => Down,
            (Wall::Backward, Down) => Right,
            (Wall::Backward, Left) => Up,
            (Wall::Backward, Up) => Left,
        }
    }
}

/// Contents of one room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub enum Cell {
    #[default]
    Empty,
    Wall(Wall),
    Arrow(Direction),
}

impl Cell {
    pub const FORWARD: Cell = Cell::Wall(Wall::Forward);
    pub const BACKWARD: Cell = Cell::Wall(Wall::Backward);
    pub const UP: Cell = Cell::Arrow(Direction::Up);
    pub const DOWN: Cell = Cell::Arrow(Direction::Down);
    pub const LEFT: Cell = Cell::Arrow(Direction::Left);
    pub const RIGHT: Cell = Cell::Arrow(Direction::Right);

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Direction a mouse leaves this room in, having entered going `dir`.
    /// Arrows override the heading outright.
    #[inline]
    pub fn redirect(self, dir: Direction) -> Direction {
        match self {
            Cell::Empty => dir,
            Cell::Wall(wall) => wall.reflect(dir),
            Cell::Arrow(arrow) => arrow,
        }
    }

    /// One-character form used in grid text and JSON (`.` is empty)
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall(Wall::Forward) => '/',
            Cell::Wall(Wall::Backward) => '\\',
            Cell::Arrow(dir) => dir.as_char(),
        }
    }

    pub fn from_symbol(symbol: char) -> Result<Self, EngineError> {
        match symbol {
            '.' | ' ' | '_' => Ok(Cell::Empty),
            '/' => Ok(Cell::FORWARD),
            '\\' => Ok(Cell::BACKWARD),
            'U' | 'u' => Ok(Cell::UP),
            'D' | 'd' => Ok(Cell::DOWN),
            'L' | 'l' => Ok(Cell::LEFT),
            'R' | 'r' => Ok(Cell::RIGHT),
            other => Err(EngineError::UnknownSymbol(other)),
        }
    }
}

impl TryFrom<char> for Cell {
    type Error = EngineError;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        Cell::from_symbol(symbol)
    }
}

impl From<Cell> for char {
    fn from(cell: Cell) -> Self {
        cell.symbol()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Which obstacle alphabet a maze is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MazeType {
    #[default]
    Walls,
    Arrows,
}

static WALL_CYCLE: [Cell; 3] = [Cell::Empty, Cell::FORWARD, Cell::BACKWARD];
static ARROW_CYCLE: [Cell; 5] = [Cell::Empty, Cell::UP, Cell::RIGHT, Cell::DOWN, Cell::LEFT];

impl MazeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MazeType::Walls => "walls",
            MazeType::Arrows => "arrows",
        }
    }

    pub fn parse(s: &str) -> Result<Self, EngineError> {
        match s.trim().to_lowercase().as_str() {
            "walls" | "wall" | "mirrors" => Ok(MazeType::Walls),
            "arrows" | "arrow" => Ok(MazeType::Arrows),
            _ => Err(EngineError::UnknownMazeType(s.to_string())),
        }
    }

    /// Edit order for a room: empty first, then each obstacle in turn
    pub fn symbol_cycle(&self) -> &'static [Cell] {
        match self {
            MazeType::Walls => &WALL_CYCLE,
            MazeType::Arrows => &ARROW_CYCLE,
        }
    }

    /// The non-empty symbols of this alphabet
    pub fn obstacles(&self) -> &'static [Cell] {
        &self.symbol_cycle()[1..]
    }

    pub fn allows(&self, cell: Cell) -> bool {
        self.symbol_cycle().contains(&cell)
    }
}

impl fmt::Display for MazeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbol a room shows after one more edit.
///
/// A symbol from the other alphabet restarts the cycle, so the next symbol
/// is the first obstacle of `maze_type`.
pub fn next_symbol(current: Cell, maze_type: MazeType) -> Cell {
    let cycle = maze_type.symbol_cycle();
    let idx = cycle.iter().position(|&c| c == current).unwrap_or(0);
    cycle[(idx + 1) % cycle.len()]
}

/// A room coordinate, row 0 at the top and column 0 at the left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        assert!(
            row < GRID_SIZE && col < GRID_SIZE,
            "cell ({row}, {col}) is outside the {GRID_SIZE}x{GRID_SIZE} grid"
        );
        Self { row, col }
    }

    /// Checked constructor for coordinates coming from outside the engine
    pub fn checked(row: usize, col: usize) -> Result<Self, EngineError> {
        if row < GRID_SIZE && col < GRID_SIZE {
            Ok(Self { row, col })
        } else {
            Err(EngineError::InvalidCell { row, col })
        }
    }

    /// All 16 rooms in row-major order
    pub fn all() -> impl Iterator<Item = CellPos> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| CellPos { row, col }))
    }
}

/// The 4×4 maze layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Grid {
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// All-empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse four whitespace-separated rows of four symbols each,
    /// e.g. `r"\... .... ..RL ...."`.
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let rows: Vec<&str> = text.split_whitespace().collect();
        if rows.len() != GRID_SIZE || rows.iter().any(|r| r.chars().count() != GRID_SIZE) {
            return Err(EngineError::MalformedGrid(text.to_string()));
        }

        let mut grid = Self::new();
        for (row, line) in rows.iter().enumerate() {
            for (col, symbol) in line.chars().enumerate() {
                grid.cells[row][col] = Cell::from_symbol(symbol)?;
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn get(&self, pos: CellPos) -> Cell {
        self.cells[pos.row][pos.col]
    }

    pub fn set(&mut self, pos: CellPos, cell: Cell) {
        self.cells[pos.row][pos.col] = cell;
    }

    /// Rows top to bottom
    pub fn rows(&self) -> &[[Cell; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Rooms with their contents in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (CellPos, Cell)> + '_ {
        CellPos::all().map(move |pos| (pos, self.get(pos)))
    }

    /// Number of non-empty rooms
    pub fn obstacle_count(&self) -> usize {
        self.iter().filter(|(_, c)| !c.is_empty()).count()
    }

    /// True when every obstacle belongs to `maze_type`'s alphabet
    pub fn uses_only(&self, maze_type: MazeType) -> bool {
        self.iter().all(|(_, c)| maze_type.allows(c))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_wall_reflections() {
        use Direction::*;
        assert_eq!(Wall::Forward.reflect(Right), Up);
        assert_eq!(Wall::Forward.reflect(Up), Right);
        assert_eq!(Wall::Forward.reflect(Left), Down);
        assert_eq!(Wall::Forward.reflect(Down), Left);
    }

    #[test]
    fn test_backward_wall_reflections() {
        use Direction::*;
        assert_eq!(Wall::Backward.reflect(Right), Down);
        assert_eq!(Wall::Backward.reflect(Down), Right);
        assert_eq!(Wall::Backward.reflect(Left), Up);
        assert_eq!(Wall::Backward.reflect(Up), Left);
    }

    #[test]
    fn test_reflection_is_involution() {
        for wall in [Wall::Forward, Wall::Backward] {
            for dir in Direction::ALL {
                assert_eq!(wall.reflect(wall.reflect(dir)), dir);
            }
        }
    }

    #[test]
    fn test_reflection_is_reversible() {
        // Running a bounce backwards retraces it.
        for wall in [Wall::Forward, Wall::Backward] {
            for dir in Direction::ALL {
                let out = wall.reflect(dir);
                assert_eq!(wall.reflect(out.opposite()), dir.opposite());
            }
        }
    }

    #[test]
    fn test_arrow_overrides_direction() {
        for dir in Direction::ALL {
            assert_eq!(Cell::LEFT.redirect(dir), Direction::Left);
            assert_eq!(Cell::Empty.redirect(dir), dir);
        }
    }

    #[test]
    fn test_next_symbol_walls_cycle() {
        let mut cell = Cell::Empty;
        let mut seen = Vec::new();
        for _ in 0..3 {
            cell = next_symbol(cell, MazeType::Walls);
            seen.push(cell);
        }
        assert_eq!(seen, vec![Cell::FORWARD, Cell::BACKWARD, Cell::Empty]);
    }

    #[test]
    fn test_next_symbol_arrows_cycle() {
        let mut cell = Cell::Empty;
        let mut seen = Vec::new();
        for _ in 0..5 {
            cell = next_symbol(cell, MazeType::Arrows);
            seen.push(cell);
        }
        assert_eq!(
            seen,
            vec![Cell::UP, Cell::RIGHT, Cell::DOWN, Cell::LEFT, Cell::Empty]
        );
    }

    #[test]
    fn test_next_symbol_foreign_alphabet_restarts() {
        assert_eq!(next_symbol(Cell::RIGHT, MazeType::Walls), Cell::FORWARD);
        assert_eq!(next_symbol(Cell::BACKWARD, MazeType::Arrows), Cell::UP);
    }

    #[test]
    fn test_grid_parse_and_display() {
        let err = Grid::parse(r"\... .U.. ..RL ..../").unwrap_err();
        assert!(matches!(err, EngineError::MalformedGrid(_)));

        let grid = Grid::parse(r"\... .U.. ..RL .../").unwrap();
        assert_eq!(grid.get(CellPos::new(0, 0)), Cell::BACKWARD);
        assert_eq!(grid.get(CellPos::new(1, 1)), Cell::UP);
        assert_eq!(grid.get(CellPos::new(2, 3)), Cell::LEFT);
        assert_eq!(grid.get(CellPos::new(3, 3)), Cell::FORWARD);
        assert_eq!(grid.obstacle_count(), 5);
        assert_eq!(grid.to_string(), "\\...\n.U..\n..RL\n.../");
    }

    #[test]
    fn test_grid_parse_rejects_unknown_symbol() {
        let err = Grid::parse("x... .... .... ....").unwrap_err();
        assert!(matches!(err, EngineError::UnknownSymbol('x')));
    }

    #[test]
    fn test_uses_only() {
        let walls = Grid::parse(r"/... .\.. .... ....").unwrap();
        assert!(walls.uses_only(MazeType::Walls));
        assert!(!walls.uses_only(MazeType::Arrows));
        assert!(Grid::new().uses_only(MazeType::Arrows));
    }

    #[test]
    fn test_grid_json_uses_symbols() {
        let grid = Grid::parse(r"\... .... .... ...R").unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert!(json.contains(r#""\\""#));
        assert!(json.contains(r#""R""#));
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }

    #[test]
    #[should_panic]
    fn test_cell_pos_out_of_range_panics() {
        let _ = CellPos::new(4, 0);
    }
}

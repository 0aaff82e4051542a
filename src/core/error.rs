use std::fmt;

use crate::perception::grid::Point;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArcError {
    EmptyGrid,
    Ragged { row: usize, expected: usize, found: usize },
    InvalidColor(u8),
    OutOfBounds(Point),
    UnknownColor(String),
    MissingSolution(String),
}

impl fmt::Display for ArcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid has no cells"),
            Self::Ragged { row, expected, found } => {
                write!(f, "row {} has {} cells, expected {}", row, found, expected)
            }
            Self::InvalidColor(c) => write!(f, "invalid color code: {}", c),
            Self::OutOfBounds(p) => write!(f, "point {} is outside the grid", p),
            Self::UnknownColor(name) => write!(f, "unknown color: {}", name),
            Self::MissingSolution(id) => write!(f, "no solution for task {}", id),
        }
    }
}

impl std::error::Error for ArcError {}

pub type Result<T> = std::result::Result<T, ArcError>;

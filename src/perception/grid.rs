// ARC board: a rectangular, row-major array of palette colors.
//
// Construction validates shape and color codes once, so everything that
// takes a `Grid` afterwards can index freely within `height x width`.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::color::Color;
use crate::core::error::{ArcError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Chebyshev distance 1 (diagonal) or Manhattan distance 1 (orthogonal).
    pub fn is_adjacent(&self, other: &Point, diagonal: bool) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        if diagonal {
            dr.max(dc) == 1
        } else {
            dr + dc == 1
        }
    }
}

impl From<(usize, usize)> for Point {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

const FOUR_WAY: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
const EIGHT_WAY: [(isize, isize); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<Color>,
}

impl Grid {
    /// Build a grid from raw rows of color codes.
    pub fn new(rows: Vec<Vec<u8>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(ArcError::EmptyGrid);
        }
        let mut cells = Vec::with_capacity(height * width);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(ArcError::Ragged { row: r, expected: width, found: row.len() });
            }
            for &code in row {
                cells.push(Color::try_from(code)?);
            }
        }
        Ok(Self { height, width, cells })
    }

    pub fn filled(height: usize, width: usize, color: Color) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(ArcError::EmptyGrid);
        }
        Ok(Self { height, width, cells: vec![color; height * width] })
    }

    /// Caller guarantees non-zero dimensions.
    pub(crate) fn blank(height: usize, width: usize, color: Color) -> Self {
        debug_assert!(height > 0 && width > 0);
        Self { height, width, cells: vec![color; height * width] }
    }

    pub fn height(&self) -> usize { self.height }
    pub fn width(&self) -> usize { self.width }
    pub fn dimensions(&self) -> (usize, usize) { (self.height, self.width) }

    pub fn in_bounds(&self, p: Point) -> bool {
        p.row < self.height && p.col < self.width
    }

    pub fn get(&self, p: Point) -> Option<Color> {
        if self.in_bounds(p) { Some(self.cells[p.row * self.width + p.col]) } else { None }
    }

    pub fn set(&mut self, p: Point, color: Color) -> Result<()> {
        if !self.in_bounds(p) {
            return Err(ArcError::OutOfBounds(p));
        }
        self.cells[p.row * self.width + p.col] = color;
        Ok(())
    }

    pub fn row(&self, r: usize) -> &[Color] {
        &self.cells[r * self.width..(r + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]> + '_ {
        self.cells.chunks(self.width)
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.rows().map(|row| row.iter().map(|c| c.code()).collect()).collect()
    }

    /// Every coordinate in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.height).flat_map(move |r| (0..self.width).map(move |c| Point::new(r, c)))
    }

    /// In-bounds neighbours of `p`, 4-connected or 8-connected.
    pub fn neighbors(&self, p: Point, diagonal: bool) -> impl Iterator<Item = Point> + '_ {
        let offsets: &'static [(isize, isize)] = if diagonal { &EIGHT_WAY } else { &FOUR_WAY };
        offsets.iter().filter_map(move |&(dr, dc)| {
            let r = p.row.checked_add_signed(dr)?;
            let c = p.col.checked_add_signed(dc)?;
            let n = Point::new(r, c);
            self.in_bounds(n).then_some(n)
        })
    }

    /// Distinct colors present, ascending.
    pub fn unique_colors(&self) -> Vec<Color> {
        let counts = self.color_counts();
        Color::ALL.into_iter().filter(|c| counts[c.code() as usize] > 0).collect()
    }

    pub fn color_counts(&self) -> [usize; 10] {
        let mut counts = [0usize; 10];
        for &c in &self.cells {
            counts[c.code() as usize] += 1;
        }
        counts
    }

    /// Most frequent color; ties go to the lower code.
    pub fn most_common_color(&self) -> Color {
        let counts = self.color_counts();
        let mut best = Color::Black;
        for c in Color::ALL {
            if counts[c.code() as usize] > counts[best.code() as usize] {
                best = c;
            }
        }
        best
    }
}

impl Index<Point> for Grid {
    type Output = Color;

    fn index(&self, p: Point) -> &Color {
        assert!(self.in_bounds(p), "point {} outside {}x{} grid", p, self.height, self.width);
        &self.cells[p.row * self.width + p.col]
    }
}

impl IndexMut<Point> for Grid {
    fn index_mut(&mut self, p: Point) -> &mut Color {
        assert!(self.in_bounds(p), "point {} outside {}x{} grid", p, self.height, self.width);
        &mut self.cells[p.row * self.width + p.col]
    }
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = ArcError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self> {
        Grid::new(rows)
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(g: Grid) -> Self {
        g.to_rows()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = row.iter().map(|c| c.to_string()).collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Grid({}x{}) {:?}", self.height, self.width, self.to_rows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[u8]]) -> Grid {
        Grid::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(Grid::new(vec![]), Err(ArcError::EmptyGrid));
        assert_eq!(Grid::new(vec![vec![]]), Err(ArcError::EmptyGrid));
        assert_eq!(
            Grid::new(vec![vec![1, 2], vec![3]]),
            Err(ArcError::Ragged { row: 1, expected: 2, found: 1 })
        );
        assert_eq!(Grid::new(vec![vec![0, 11]]), Err(ArcError::InvalidColor(11)));
    }

    #[test]
    fn indexing_and_set() {
        let mut g = grid(&[&[0, 1, 2], &[3, 4, 5]]);
        assert_eq!(g.dimensions(), (2, 3));
        assert_eq!(g[Point::new(1, 2)], Color::Gray);
        assert_eq!(g.get(Point::new(2, 0)), None);
        g.set(Point::new(0, 0), Color::Maroon).unwrap();
        assert_eq!(g.row(0), &[Color::Maroon, Color::Blue, Color::Red]);
        assert_eq!(g.set(Point::new(0, 3), Color::Red), Err(ArcError::OutOfBounds(Point::new(0, 3))));
    }

    #[test]
    fn neighbours_respect_bounds() {
        let g = grid(&[&[0, 0, 0], &[0, 0, 0], &[0, 0, 0]]);
        assert_eq!(g.neighbors(Point::new(0, 0), false).count(), 2);
        assert_eq!(g.neighbors(Point::new(0, 0), true).count(), 3);
        assert_eq!(g.neighbors(Point::new(1, 1), false).count(), 4);
        assert_eq!(g.neighbors(Point::new(1, 1), true).count(), 8);
    }

    #[test]
    fn points_are_row_major() {
        let g = grid(&[&[0, 0], &[0, 0]]);
        let pts: Vec<_> = g.points().collect();
        assert_eq!(pts, vec![Point::new(0, 0), Point::new(0, 1), Point::new(1, 0), Point::new(1, 1)]);
    }

    #[test]
    fn color_statistics() {
        let g = grid(&[&[3, 0, 3], &[1, 3, 0]]);
        assert_eq!(g.unique_colors(), vec![Color::Black, Color::Blue, Color::Green]);
        assert_eq!(g.most_common_color(), Color::Green);
    }

    #[test]
    fn display_and_json() {
        let g = grid(&[&[1, 0], &[0, 2]]);
        assert_eq!(g.to_string(), "1 0\n0 2");
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(json, "[[1,0],[0,2]]");
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
        assert!(serde_json::from_str::<Grid>("[[1,0],[2]]").is_err());
    }

    #[test]
    fn filled_grid_and_tuple_points() {
        let g = Grid::filled(2, 3, Color::Azure).unwrap();
        assert_eq!(g.dimensions(), (2, 3));
        assert_eq!(g.unique_colors(), vec![Color::Azure]);
        assert_eq!(g[Point::from((1, 2))], Color::Azure);
        assert_eq!(Point::from((1, 2)), Point::new(1, 2));
        assert_eq!(Grid::filled(0, 3, Color::Azure), Err(ArcError::EmptyGrid));
        assert_eq!(Grid::filled(3, 0, Color::Azure), Err(ArcError::EmptyGrid));
    }

    #[test]
    fn adjacency_between_points() {
        let a = Point::new(1, 1);
        assert!(a.is_adjacent(&Point::new(0, 1), false));
        assert!(!a.is_adjacent(&Point::new(0, 0), false));
        assert!(a.is_adjacent(&Point::new(0, 0), true));
        assert!(!a.is_adjacent(&a, true));
    }
}

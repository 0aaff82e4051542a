// Connected-component object detection for ARC grids.
//
// An object is a maximal group of foreground cells joined under an
// adjacency rule (4- or 8-connected) and a color rule (same color only,
// or any foreground color). Background colors are never part of an
// object and never bridge two regions.
//
// Objects are reported in the order their seed cell is met during a
// row-major scan, so "first object" and min/max tie-breaks are stable.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::color::Color;
use super::grid::{Grid, Point};
use crate::core::config::DetectConfig;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Object {
    /// Member cells with their colors, row-major.
    pub cells: Vec<(Point, Color)>,
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl Object {
    /// Build from a non-empty cell list. Cells are sorted row-major.
    pub fn from_cells(mut cells: Vec<(Point, Color)>) -> Self {
        cells.sort_unstable_by_key(|&(p, _)| p);
        let top = cells.iter().map(|(p, _)| p.row).min().unwrap_or(0);
        let left = cells.iter().map(|(p, _)| p.col).min().unwrap_or(0);
        let bottom = cells.iter().map(|(p, _)| p.row).max().unwrap_or(0);
        let right = cells.iter().map(|(p, _)| p.col).max().unwrap_or(0);
        Self { cells, top, left, bottom, right }
    }

    pub fn height(&self) -> usize { self.bottom - self.top + 1 }
    pub fn width(&self) -> usize { self.right - self.left + 1 }
    pub fn area(&self) -> usize { self.cells.len() }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().map(|&(p, _)| p)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.cells.binary_search_by_key(&p, |&(q, _)| q).is_ok()
    }

    /// The single color of a monochromatic object.
    pub fn color(&self) -> Option<Color> {
        let first = self.cells.first()?.1;
        self.cells.iter().all(|&(_, c)| c == first).then_some(first)
    }

    /// Distinct member colors, ascending.
    pub fn colors(&self) -> Vec<Color> {
        let mut seen = [false; 10];
        for &(_, c) in &self.cells {
            seen[c.code() as usize] = true;
        }
        Color::ALL.into_iter().filter(|c| seen[c.code() as usize]).collect()
    }

    /// Most frequent member color; ties go to the lower code.
    pub fn dominant_color(&self) -> Color {
        let mut counts = [0usize; 10];
        for &(_, c) in &self.cells {
            counts[c.code() as usize] += 1;
        }
        let mut best = Color::Black;
        for c in Color::ALL {
            if counts[c.code() as usize] > counts[best.code() as usize] {
                best = c;
            }
        }
        best
    }

    pub fn center(&self) -> Point {
        Point::new((self.top + self.bottom) / 2, (self.left + self.right) / 2)
    }

    /// True when the object fills its whole bounding box.
    pub fn is_rectangle(&self) -> bool {
        self.area() == self.height() * self.width()
    }

    /// Crop of the object to its bounding box, non-member cells set to `background`.
    pub fn to_grid(&self, background: Color) -> Grid {
        let mut g = Grid::blank(self.height(), self.width(), background);
        for &(p, c) in &self.cells {
            g[Point::new(p.row - self.top, p.col - self.left)] = c;
        }
        g
    }
}

/// Partition the foreground cells of `grid` into objects.
pub fn detect_objects(grid: &Grid, config: &DetectConfig) -> Vec<Object> {
    let (rows, cols) = grid.dimensions();
    let mut visited = vec![false; rows * cols];
    let mut objects = Vec::new();

    for seed in grid.points() {
        if visited[seed.row * cols + seed.col] { continue; }
        let seed_color = grid[seed];
        if config.is_background(seed_color) { continue; }

        let mut cells = Vec::new();
        let mut stack = vec![seed];
        visited[seed.row * cols + seed.col] = true;

        while let Some(p) = stack.pop() {
            let color = grid[p];
            cells.push((p, color));
            for n in grid.neighbors(p, config.go_diagonal) {
                let idx = n.row * cols + n.col;
                if visited[idx] { continue; }
                let nc = grid[n];
                if config.is_background(nc) { continue; }
                if config.monochromatic && nc != seed_color { continue; }
                visited[idx] = true;
                stack.push(n);
            }
        }
        objects.push(Object::from_cells(cells));
    }

    debug!(
        objects = objects.len(),
        height = rows,
        width = cols,
        diagonal = config.go_diagonal,
        monochromatic = config.monochromatic,
        "detected objects"
    );
    objects
}

/// `detect_objects` with the default configuration.
pub fn detect_objects_default(grid: &Grid) -> Vec<Object> {
    detect_objects(grid, &DetectConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::color::ColorSet;
    use proptest::prelude::*;
    use rustc_hash::FxHashSet;

    fn grid(rows: &[&[u8]]) -> Grid {
        Grid::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn point_set(obj: &Object) -> Vec<(usize, usize)> {
        obj.points().map(|p| (p.row, p.col)).collect()
    }

    fn cfg(diagonal: bool, mono: bool) -> DetectConfig {
        DetectConfig::new().with_ignore([Color::Black]).with_diagonal(diagonal).with_monochromatic(mono)
    }

    #[test]
    fn orthogonal_monochromatic_split() {
        let g = grid(&[&[1, 1, 0], &[0, 1, 0], &[0, 0, 2]]);
        let objs = detect_objects(&g, &cfg(false, true));
        assert_eq!(objs.len(), 2);
        assert_eq!(point_set(&objs[0]), vec![(0, 0), (0, 1), (1, 1)]);
        assert_eq!(objs[0].color(), Some(Color::Blue));
        assert_eq!(point_set(&objs[1]), vec![(2, 2)]);
        assert_eq!(objs[1].color(), Some(Color::Red));
    }

    #[test]
    fn diagonal_touch_split_only_by_color_rule() {
        let g = grid(&[&[1, 1, 0], &[0, 1, 0], &[0, 0, 2]]);
        let objs = detect_objects(&g, &cfg(true, true));
        assert_eq!(objs.len(), 2);
        assert_eq!(point_set(&objs[0]), vec![(0, 0), (0, 1), (1, 1)]);
        assert_eq!(point_set(&objs[1]), vec![(2, 2)]);

        // (1,1) and (2,2) touch diagonally, so mixed colors merge them.
        let mixed = detect_objects(&g, &cfg(true, false));
        assert_eq!(mixed.len(), 1);
        assert_eq!(mixed[0].area(), 4);
    }

    #[test]
    fn diagonal_mixed_color_single_object() {
        let g = grid(&[&[1, 2], &[2, 1]]);
        let objs = detect_objects(&g, &cfg(true, false));
        assert_eq!(objs.len(), 1);
        assert_eq!(objs[0].area(), 4);
        assert_eq!(objs[0].color(), None);
        assert_eq!(objs[0].colors(), vec![Color::Blue, Color::Red]);
    }

    #[test]
    fn checkerboard_without_diagonal_mixed_is_one_object() {
        let g = grid(&[&[1, 2], &[2, 1]]);
        let objs = detect_objects(&g, &cfg(false, false));
        assert_eq!(objs.len(), 1);
        assert_eq!(objs[0].area(), 4);
    }

    #[test]
    fn checkerboard_without_diagonal_monochromatic_is_four_cells() {
        let g = grid(&[&[1, 2], &[2, 1]]);
        let objs = detect_objects(&g, &cfg(false, true));
        assert_eq!(objs.len(), 4);
        let seeds: Vec<_> = objs.iter().map(point_set).collect();
        assert_eq!(seeds, vec![vec![(0, 0)], vec![(0, 1)], vec![(1, 0)], vec![(1, 1)]]);
        assert!(objs.iter().all(|o| o.area() == 1));
    }

    #[test]
    fn monochromatic_splits_touching_colors() {
        let g = grid(&[&[3, 3, 4], &[3, 4, 4]]);
        assert_eq!(detect_objects(&g, &cfg(false, false)).len(), 1);
        let mono = detect_objects(&g, &cfg(false, true));
        assert_eq!(mono.len(), 2);
        assert_eq!(mono[0].color(), Some(Color::Green));
        assert_eq!(mono[1].color(), Some(Color::Yellow));
    }

    #[test]
    fn all_background_is_empty() {
        let g = grid(&[&[0, 0], &[0, 0]]);
        assert!(detect_objects_default(&g).is_empty());
        let g = grid(&[&[5, 0], &[0, 5]]);
        let cfg = DetectConfig::new().with_ignore([Color::Black, Color::Gray]);
        assert!(detect_objects(&g, &cfg).is_empty());
    }

    #[test]
    fn ignored_color_does_not_bridge() {
        let g = grid(&[&[1, 5, 1]]);
        let cfg = DetectConfig::new().with_ignore([Color::Gray]);
        let objs = detect_objects(&g, &cfg);
        assert_eq!(objs.len(), 2);
    }

    #[test]
    fn black_counts_as_foreground_when_not_ignored() {
        let g = grid(&[&[0, 0], &[5, 5]]);
        let cfg = DetectConfig::new().with_ignore([Color::Gray]);
        let objs = detect_objects(&g, &cfg);
        assert_eq!(objs.len(), 1);
        assert_eq!(objs[0].color(), Some(Color::Black));
    }

    #[test]
    fn bounding_box_and_crop() {
        let g = grid(&[
            &[0, 0, 0, 0],
            &[0, 6, 6, 0],
            &[0, 0, 6, 0],
            &[0, 0, 0, 0],
        ]);
        let objs = detect_objects_default(&g);
        assert_eq!(objs.len(), 1);
        let o = &objs[0];
        assert_eq!((o.top, o.left, o.bottom, o.right), (1, 1, 2, 2));
        assert_eq!((o.height(), o.width()), (2, 2));
        assert!(!o.is_rectangle());
        assert!(o.contains(Point::new(2, 2)));
        assert!(!o.contains(Point::new(2, 1)));
        assert_eq!(o.to_grid(Color::Black).to_rows(), vec![vec![6, 6], vec![0, 6]]);
        assert_eq!(o.center(), Point::new(1, 1));
    }

    #[test]
    fn dominant_color_tie_breaks_low() {
        let o = Object::from_cells(vec![
            (Point::new(0, 1), Color::Red),
            (Point::new(0, 0), Color::Blue),
        ]);
        assert_eq!(o.dominant_color(), Color::Blue);
        assert_eq!(o.cells[0].0, Point::new(0, 0));
    }

    #[test]
    fn does_not_mutate_source() {
        let g = grid(&[&[1, 0, 2]]);
        let before = g.clone();
        let a = detect_objects_default(&g);
        let b = detect_objects_default(&g);
        assert_eq!(g, before);
        assert_eq!(a, b);
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (1usize..8, 1usize..8).prop_flat_map(|(h, w)| {
            prop::collection::vec(prop::collection::vec(0u8..4, w), h)
                .prop_map(|rows| Grid::new(rows).unwrap())
        })
    }

    fn arb_config() -> impl Strategy<Value = DetectConfig> {
        (any::<bool>(), any::<bool>(), 0u16..16).prop_map(|(diag, mono, mask)| {
            let ignore: ColorSet = Color::ALL[..4]
                .iter()
                .copied()
                .filter(|c| mask & (1 << c.code()) != 0)
                .collect();
            DetectConfig { ignore_colors: ignore, go_diagonal: diag, monochromatic: mono }
        })
    }

    fn connected(obj: &Object, diagonal: bool) -> bool {
        let pts: Vec<Point> = obj.points().collect();
        let mut reached = FxHashSet::default();
        let mut stack = vec![pts[0]];
        reached.insert(pts[0]);
        while let Some(p) = stack.pop() {
            for &q in &pts {
                if !reached.contains(&q) && p.is_adjacent(&q, diagonal) {
                    reached.insert(q);
                    stack.push(q);
                }
            }
        }
        reached.len() == pts.len()
    }

    proptest! {
        #[test]
        fn objects_partition_foreground(g in arb_grid(), cfg in arb_config()) {
            let objs = detect_objects(&g, &cfg);
            let mut seen = FxHashSet::default();
            for o in &objs {
                for p in o.points() {
                    prop_assert!(seen.insert(p), "cell {} in two objects", p);
                }
            }
            let foreground: FxHashSet<Point> =
                g.points().filter(|&p| !cfg.is_background(g[p])).collect();
            prop_assert_eq!(seen, foreground);
        }

        #[test]
        fn objects_are_connected(g in arb_grid(), cfg in arb_config()) {
            for o in detect_objects(&g, &cfg) {
                prop_assert!(connected(&o, cfg.go_diagonal));
            }
        }

        #[test]
        fn objects_are_maximal(g in arb_grid(), cfg in arb_config()) {
            let objs = detect_objects(&g, &cfg);
            for (i, a) in objs.iter().enumerate() {
                for b in &objs[i + 1..] {
                    for (p, pc) in &a.cells {
                        for (q, qc) in &b.cells {
                            let mergeable = !cfg.monochromatic || pc == qc;
                            prop_assert!(!(mergeable && p.is_adjacent(q, cfg.go_diagonal)));
                        }
                    }
                }
            }
        }

        #[test]
        fn monochromatic_objects_have_one_color(g in arb_grid(), cfg in arb_config()) {
            let cfg = cfg.with_monochromatic(true);
            for o in detect_objects(&g, &cfg) {
                prop_assert!(o.color().is_some());
            }
        }

        #[test]
        fn detection_is_deterministic_in_scan_order(g in arb_grid(), cfg in arb_config()) {
            let a = detect_objects(&g, &cfg);
            let b = detect_objects(&g, &cfg);
            prop_assert_eq!(&a, &b);
            let seeds: Vec<Point> = a.iter().map(|o| o.cells[0].0).collect();
            let mut sorted = seeds.clone();
            sorted.sort();
            prop_assert_eq!(seeds, sorted);
        }
    }
}

// Object-centric transforms for ARC-AGI.
//
// Each transform runs the object detector once and rewrites a copy of the
// input based on object properties (bounding box, area, color). The
// `Solver` trait wraps them so a harness can try each one against the
// train pairs and keep the first that reproduces every output.
//
// A solver that has nothing to say about a grid returns
// `Outcome::Unsolved`, never the input unchanged.

use std::fmt;

use tracing::trace;

use crate::core::config::DetectConfig;
use crate::perception::color::Color;
use crate::perception::grid::{Grid, Point};
use crate::perception::objects::{detect_objects, Object};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Solved(Grid),
    Unsolved,
}

impl Outcome {
    pub fn grid(&self) -> Option<&Grid> {
        match self {
            Outcome::Solved(g) => Some(g),
            Outcome::Unsolved => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }
}

pub trait Solver {
    fn name(&self) -> String;
    fn solve(&self, grid: &Grid) -> Outcome;
}

/// Color written where a transform needs "background".
fn background(cfg: &DetectConfig) -> Color {
    cfg.ignore_colors.iter().next().unwrap_or(Color::Black)
}

// --- Bounding-box operations ---

/// Fill the background cells of each object's bounding box with its dominant color.
pub fn complete_bbox(grid: &Grid, cfg: &DetectConfig) -> Grid {
    let mut result = grid.clone();
    for obj in detect_objects(grid, cfg) {
        let color = obj.dominant_color();
        for r in obj.top..=obj.bottom {
            for c in obj.left..=obj.right {
                let p = Point::new(r, c);
                if cfg.is_background(result[p]) {
                    result[p] = color;
                }
            }
        }
    }
    result
}

/// Draw the bounding-box outline of every object at least 2x2.
pub fn outline_objects(grid: &Grid, cfg: &DetectConfig, outline: Color) -> Grid {
    let mut result = grid.clone();
    for obj in detect_objects(grid, cfg) {
        if obj.height() < 2 || obj.width() < 2 { continue; }
        for c in obj.left..=obj.right {
            result[Point::new(obj.top, c)] = outline;
            result[Point::new(obj.bottom, c)] = outline;
        }
        for r in obj.top..=obj.bottom {
            result[Point::new(r, obj.left)] = outline;
            result[Point::new(r, obj.right)] = outline;
        }
    }
    result
}

// --- Marker-based line extension ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDir { Horizontal, Vertical, Both }

/// Single-cell objects extend their color along their row and/or column,
/// painting background cells only.
pub fn extend_markers(grid: &Grid, cfg: &DetectConfig, dir: LineDir) -> Grid {
    let (rows, cols) = grid.dimensions();
    let mut result = grid.clone();
    let markers: Vec<(Point, Color)> = detect_objects(grid, cfg)
        .into_iter()
        .filter(|o| o.area() == 1)
        .map(|o| o.cells[0])
        .collect();

    for (m, color) in markers {
        let mut paint = |p: Point| {
            if cfg.is_background(result[p]) {
                result[p] = color;
            }
        };
        if matches!(dir, LineDir::Horizontal | LineDir::Both) {
            for c in 0..cols { paint(Point::new(m.row, c)); }
        }
        if matches!(dir, LineDir::Vertical | LineDir::Both) {
            for r in 0..rows { paint(Point::new(r, m.col)); }
        }
    }
    result
}

// --- Object selection ---

/// Crop to the largest object; ties go to the first in scan order.
pub fn keep_largest(grid: &Grid, cfg: &DetectConfig) -> Option<Grid> {
    let objects = detect_objects(grid, cfg);
    let mut best: Option<&Object> = None;
    for obj in &objects {
        if best.map_or(true, |b| obj.area() > b.area()) {
            best = Some(obj);
        }
    }
    best.map(|o| o.to_grid(background(cfg)))
}

/// Crop to the smallest object; ties go to the first in scan order.
pub fn keep_smallest(grid: &Grid, cfg: &DetectConfig) -> Option<Grid> {
    let objects = detect_objects(grid, cfg);
    objects.iter().min_by_key(|o| o.area()).map(|o| o.to_grid(background(cfg)))
}

// --- Size-ranked recoloring ---

/// Distinct object areas, largest first.
fn area_ranks(objects: &[Object]) -> Vec<usize> {
    let mut areas: Vec<usize> = objects.iter().map(|o| o.area()).collect();
    areas.sort_unstable_by(|a, b| b.cmp(a));
    areas.dedup();
    areas
}

/// Recolor objects by area rank: the largest area gets `palette[0]`, the
/// next distinct area `palette[1]`, and so on. Ranks past the palette keep
/// their colors.
pub fn recolor_by_size(grid: &Grid, cfg: &DetectConfig, palette: &[Color]) -> Grid {
    let objects = detect_objects(grid, cfg);
    let ranks = area_ranks(&objects);
    let mut result = grid.clone();
    for obj in &objects {
        let rank = ranks.iter().position(|&a| a == obj.area()).unwrap_or(usize::MAX);
        if let Some(&color) = palette.get(rank) {
            for p in obj.points() {
                result[p] = color;
            }
        }
    }
    result
}

/// Read the rank palette off one train pair: the output color under each
/// rank's first object. Fails if a rank maps to two colors.
pub fn learn_size_palette(input: &Grid, output: &Grid, cfg: &DetectConfig) -> Option<Vec<Color>> {
    if input.dimensions() != output.dimensions() { return None; }
    let objects = detect_objects(input, cfg);
    if objects.is_empty() { return None; }
    let ranks = area_ranks(&objects);
    let mut palette: Vec<Option<Color>> = vec![None; ranks.len()];
    for obj in &objects {
        let rank = ranks.iter().position(|&a| a == obj.area())?;
        let color = output[obj.cells[0].0];
        match palette[rank] {
            Some(prev) if prev != color => return None,
            _ => palette[rank] = Some(color),
        }
    }
    palette.into_iter().collect()
}

// --- Solver catalog ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectOp {
    CompleteBBox,
    Outline(Color),
    ExtendMarkers(LineDir),
    KeepLargest,
    KeepSmallest,
    RecolorBySize(Vec<Color>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSolver {
    pub op: ObjectOp,
    pub config: DetectConfig,
}

impl ObjectSolver {
    pub fn new(op: ObjectOp, config: DetectConfig) -> Self {
        Self { op, config }
    }

    /// Every parameter-free transform, plus one outline per non-background color.
    pub fn catalog(config: &DetectConfig) -> Vec<ObjectSolver> {
        let mut ops = vec![
            ObjectOp::CompleteBBox,
            ObjectOp::KeepLargest,
            ObjectOp::KeepSmallest,
            ObjectOp::ExtendMarkers(LineDir::Both),
            ObjectOp::ExtendMarkers(LineDir::Horizontal),
            ObjectOp::ExtendMarkers(LineDir::Vertical),
        ];
        for c in Color::ALL {
            if !config.is_background(c) {
                ops.push(ObjectOp::Outline(c));
            }
        }
        ops.into_iter().map(|op| ObjectSolver::new(op, *config)).collect()
    }

    /// The catalog plus solvers whose parameters are read off the train pairs.
    pub fn candidates(pairs: &[(&Grid, &Grid)], config: &DetectConfig) -> Vec<ObjectSolver> {
        let mut solvers = Self::catalog(config);
        if let Some((input, output)) = pairs.first() {
            if let Some(palette) = learn_size_palette(input, output, config) {
                solvers.push(ObjectSolver::new(ObjectOp::RecolorBySize(palette), *config));
            }
        }
        solvers
    }
}

impl fmt::Display for ObjectOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectOp::CompleteBBox => write!(f, "complete_bbox"),
            ObjectOp::Outline(c) => write!(f, "outline_{}", c.name()),
            ObjectOp::ExtendMarkers(LineDir::Both) => write!(f, "extend_markers_cross"),
            ObjectOp::ExtendMarkers(LineDir::Horizontal) => write!(f, "extend_markers_h"),
            ObjectOp::ExtendMarkers(LineDir::Vertical) => write!(f, "extend_markers_v"),
            ObjectOp::KeepLargest => write!(f, "keep_largest"),
            ObjectOp::KeepSmallest => write!(f, "keep_smallest"),
            ObjectOp::RecolorBySize(_) => write!(f, "recolor_by_size"),
        }
    }
}

impl Solver for ObjectSolver {
    fn name(&self) -> String {
        self.op.to_string()
    }

    fn solve(&self, grid: &Grid) -> Outcome {
        let cfg = &self.config;
        let result = match &self.op {
            ObjectOp::CompleteBBox => Some(complete_bbox(grid, cfg)),
            ObjectOp::Outline(c) => Some(outline_objects(grid, cfg, *c)),
            ObjectOp::ExtendMarkers(dir) => Some(extend_markers(grid, cfg, *dir)),
            ObjectOp::KeepLargest => keep_largest(grid, cfg),
            ObjectOp::KeepSmallest => keep_smallest(grid, cfg),
            ObjectOp::RecolorBySize(palette) => Some(recolor_by_size(grid, cfg, palette)),
        };
        result.map_or(Outcome::Unsolved, Outcome::Solved)
    }
}

/// First solver whose output matches every train pair.
pub fn learn_solver<'a, S: Solver>(pairs: &[(&Grid, &Grid)], solvers: &'a [S]) -> Option<&'a S> {
    if pairs.is_empty() { return None; }
    solvers.iter().find(|s| {
        let ok = pairs.iter().all(|(input, output)| s.solve(input).grid() == Some(*output));
        trace!(solver = %s.name(), matched = ok, "checked solver");
        ok
    })
}

pub mod color;
pub mod grid;
pub mod objects;
pub mod task;

pub use color::{Color, ColorSet};
pub use grid::{Grid, Point};
pub use objects::{detect_objects, detect_objects_default, Object};

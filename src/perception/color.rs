// ARC palette: ten colors, coded 0..=9. Black is the conventional background.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::ArcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Red = 2,
    Green = 3,
    Yellow = 4,
    Gray = 5,
    Magenta = 6,
    Orange = 7,
    Azure = 8,
    Maroon = 9,
}

impl Color {
    pub const ALL: [Color; 10] = [
        Color::Black, Color::Blue, Color::Red, Color::Green, Color::Yellow,
        Color::Gray, Color::Magenta, Color::Orange, Color::Azure, Color::Maroon,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Blue => "blue",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Gray => "gray",
            Color::Magenta => "magenta",
            Color::Orange => "orange",
            Color::Azure => "azure",
            Color::Maroon => "maroon",
        }
    }
}

impl TryFrom<u8> for Color {
    type Error = ArcError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Color::ALL.get(code as usize).copied().ok_or(ArcError::InvalidColor(code))
    }
}

impl From<Color> for u8 {
    fn from(c: Color) -> u8 {
        c.code()
    }
}

impl FromStr for Color {
    type Err = ArcError;

    /// Accepts a digit (`"5"`) or a name (`"gray"`, also `"grey"` and `"pink"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return Color::try_from(code);
        }
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "grey" => return Ok(Color::Gray),
            "pink" => return Ok(Color::Magenta),
            _ => {}
        }
        Color::ALL
            .iter()
            .copied()
            .find(|c| c.name() == lower)
            .ok_or_else(|| ArcError::UnknownColor(s.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Set of palette colors packed into a bitmask.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorSet(u16);

impl ColorSet {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn single(color: Color) -> Self {
        Self(1 << color.code())
    }

    pub fn insert(&mut self, color: Color) {
        self.0 |= 1 << color.code();
    }

    pub fn contains(&self, color: Color) -> bool {
        self.0 & (1 << color.code()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        Color::ALL.into_iter().filter(move |&c| self.contains(c))
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        let mut set = ColorSet::new();
        for c in iter {
            set.insert(c);
        }
        set
    }
}

impl fmt::Debug for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|c| c.name())).finish()
    }
}

impl Serialize for ColorSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for ColorSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let colors = Vec::<Color>::deserialize(deserializer)?;
        Ok(colors.into_iter().collect())
    }
}

//! Display colors assigned to segments

use crate::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Colors used when no palette is configured
pub const DEFAULT_COLORS: [&str; 10] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ac",
];

/// Ordered, non-empty list of color strings (`#RRGGBB` or named colors)
///
/// Segment `id` gets `colors[id % len]`, so colors repeat once the palette is exhausted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Create a palette, rejecting an empty color list
    pub fn new<I, S>(colors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        if colors.is_empty() {
            return Err(DataError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Color for the segment with the given ordinal
    #[inline]
    pub fn color(&self, id: usize) -> &str {
        &self.colors[id % self.colors.len()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false, palettes cannot be empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = DataError;

    fn try_from(colors: Vec<String>) -> Result<Self> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<String> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

/// Parses a comma separated color list, e.g. `#ff0000,#00ff00,blue`
impl FromStr for Palette {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(
            s.split(',')
                .map(str::trim)
                .filter(|color| !color.is_empty()),
        )
    }
}

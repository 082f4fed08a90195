//! Resolution of query parameters into a grid layout.
//!
//! Two conventions share the `/grid` endpoint:
//! - `size`: a square board of `size * multiplier` cells per side, divided
//!   into blocks (the default when no parameter is given).
//! - `n` / `m`: a plain board of `n` rows and `m` columns.
//!
//! Unparsable, missing or non-positive values fall back to defaults; they are
//! never reported as errors.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::Grid;

/// Block side length used by the `size` convention.
pub const DEFAULT_MULTIPLIER: u32 = 3;

/// `size` used when the parameter is missing or invalid.
pub const DEFAULT_SIZE: u32 = 3;

/// Row and column count used when `n` or `m` is missing or invalid.
pub const DEFAULT_EXTENT: u32 = 10;

/// Largest side length a request may produce.
pub const DEFAULT_MAX_DIMENSION: u32 = 300;

/// Defaults and limits applied while resolving a [`GridQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDefaults {
    /// Block side length for the `size` convention.
    /// Default: 3
    pub multiplier: u32,

    /// Fallback `size`.
    /// Default: 3
    pub default_size: u32,

    /// Fallback row count for the `n`/`m` convention.
    /// Default: 10
    pub default_rows: u32,

    /// Fallback column count for the `n`/`m` convention.
    /// Default: 10
    pub default_cols: u32,

    /// Computed side lengths never exceed this value; block boards are
    /// capped at the largest whole number of blocks that fits.
    /// Default: 300
    pub max_dimension: u32,
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            multiplier: DEFAULT_MULTIPLIER,
            default_size: DEFAULT_SIZE,
            default_rows: DEFAULT_EXTENT,
            default_cols: DEFAULT_EXTENT,
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }
}

impl LayoutDefaults {
    /// Sets the block multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the fallback `size`.
    #[must_use]
    pub fn with_default_size(mut self, size: u32) -> Self {
        self.default_size = size;
        self
    }

    /// Sets the fallback row and column counts.
    #[must_use]
    pub fn with_default_extent(mut self, rows: u32, cols: u32) -> Self {
        self.default_rows = rows;
        self.default_cols = cols;
        self
    }

    /// Sets the side length cap.
    #[must_use]
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    /// Validates the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if any value is zero or the cap is
    /// smaller than one block.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("multiplier", self.multiplier),
            ("default_size", self.default_size),
            ("default_rows", self.default_rows),
            ("default_cols", self.default_cols),
            ("max_dimension", self.max_dimension),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(Error::invalid_config(format!(
                    "{name} must be greater than 0"
                )));
            }
        }
        if self.max_dimension < self.multiplier {
            return Err(Error::invalid_config(
                "max_dimension must be at least multiplier",
            ));
        }
        Ok(())
    }
}

/// Raw grid parameters taken from a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridQuery {
    /// Raw `size` value.
    pub size: Option<String>,
    /// Raw `n` (rows) value.
    pub n: Option<String>,
    /// Raw `m` (columns) value.
    pub m: Option<String>,
}

impl GridQuery {
    /// Collects the recognised keys from decoded query pairs.
    ///
    /// The first occurrence of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "size" => &mut query.size,
                "n" => &mut query.n,
                "m" => &mut query.m,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }

    /// Picks the convention and substitutes defaults.
    ///
    /// `size` takes precedence; `n`/`m` are used only when `size` is absent
    /// and at least one of them is present.
    #[must_use]
    pub fn resolve(&self, defaults: &LayoutDefaults) -> GridLayout {
        let cap = defaults.max_dimension;

        if self.size.is_none() && (self.n.is_some() || self.m.is_some()) {
            let rows = parse_positive(self.n.as_deref()).unwrap_or(defaults.default_rows);
            let cols = parse_positive(self.m.as_deref()).unwrap_or(defaults.default_cols);
            return GridLayout::Plain {
                rows: rows.min(cap),
                cols: cols.min(cap),
            };
        }

        // Whole blocks only: cap the block count, not the side length.
        let max_size = (cap / defaults.multiplier.max(1)).max(1);
        let size = parse_positive(self.size.as_deref())
            .unwrap_or(defaults.default_size)
            .min(max_size);
        GridLayout::Blocks {
            dimension: size.saturating_mul(defaults.multiplier),
            multiplier: defaults.multiplier,
        }
    }
}

/// Parses a strictly positive integer, saturating values beyond `u32`.
fn parse_positive(raw: Option<&str>) -> Option<u32> {
    let value = raw?.parse::<i64>().ok().filter(|v| *v > 0)?;
    Some(u32::try_from(value).unwrap_or(u32::MAX))
}

/// A fully resolved grid shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLayout {
    /// Square board divided into blocks of `multiplier` cells.
    Blocks {
        /// Side length in cells.
        dimension: u32,
        /// Block side length.
        multiplier: u32,
    },
    /// Plain board without block markers.
    Plain {
        /// Row count.
        rows: u32,
        /// Column count.
        cols: u32,
    },
}

impl GridLayout {
    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> u32 {
        match *self {
            Self::Blocks { dimension, .. } => dimension,
            Self::Plain { rows, .. } => rows,
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> u32 {
        match *self {
            Self::Blocks { dimension, .. } => dimension,
            Self::Plain { cols, .. } => cols,
        }
    }

    /// Short name of the convention, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Blocks { .. } => "blocks",
            Self::Plain { .. } => "plain",
        }
    }

    /// Builds the grid.
    #[must_use]
    pub fn build(&self) -> Grid {
        match *self {
            Self::Blocks {
                dimension,
                multiplier,
            } => Grid::blocks(dimension, multiplier),
            Self::Plain { rows, cols } => Grid::plain(rows, cols),
        }
    }
}

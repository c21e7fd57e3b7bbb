use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Flow direction of the layered layout.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Left to right.
    #[default]
    LR,
    /// Right to left.
    RL,
    /// Top to bottom.
    #[serde(alias = "TD")]
    TB,
    /// Bottom to top.
    BT,
}

impl Direction {
    pub fn parse(s: &str) -> Result<Self, LayoutError> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LR" => Ok(Self::LR),
            "RL" => Ok(Self::RL),
            "TB" | "TD" => Ok(Self::TB),
            "BT" => Ok(Self::BT),
            other => Err(LayoutError::UnknownDirection(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LR => "LR",
            Self::RL => "RL",
            Self::TB => "TB",
            Self::BT => "BT",
        }
    }

    /// Whether ranks advance along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LR | Self::RL)
    }

    /// Whether rank 0 sits at the far end of the rank axis.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::RL | Self::BT)
    }
}

impl FromStr for Direction {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node box and spacing parameters (logical units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between neighbouring nodes of the same rank.
    pub node_sep: f64,
    /// Gap between consecutive ranks.
    pub rank_sep: f64,
    pub direction: Direction,
    /// Upper bound on barycenter sweeps during crossing reduction.
    pub max_sweeps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 90.0,
            node_sep: 120.0,
            rank_sep: 200.0,
            direction: Direction::LR,
            max_sweeps: 24,
        }
    }
}

impl LayoutConfig {
    pub fn with_direction(direction: Direction) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), LayoutError> {
        let dims = [
            ("node_width", self.node_width, false),
            ("node_height", self.node_height, false),
            ("node_sep", self.node_sep, true),
            ("rank_sep", self.rank_sep, true),
        ];
        for (name, value, zero_ok) in dims {
            let ok = value.is_finite() && (value > 0.0 || (zero_ok && value == 0.0));
            if !ok {
                return Err(LayoutError::Solver(format!("invalid {name}: {value}")));
            }
        }
        Ok(())
    }

    /// Box extent along the cross (within-rank) axis.
    pub(crate) fn breadth(&self) -> f64 {
        if self.direction.is_horizontal() {
            self.node_height
        } else {
            self.node_width
        }
    }

    /// Box extent along the rank axis.
    pub(crate) fn depth(&self) -> f64 {
        if self.direction.is_horizontal() {
            self.node_width
        } else {
            self.node_height
        }
    }
}

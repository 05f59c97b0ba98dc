//! Grid positions of diagram elements.
//!
//! Positions are plain values. Whether a position lies on a particular
//! fretboard is decided by [`Diagram`](crate::Diagram), which knows the string
//! and fret counts.

use std::{fmt, str::FromStr};

/// The cell of a mark.
///
/// Fret `0` sits above the nut and fret `num_frets + 1` below the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkPosition {
    string: u32,
    fret: u32,
}

impl MarkPosition {
    pub fn new(string: u32, fret: u32) -> Self {
        Self { string, fret }
    }

    /// Returns the 1-based string number.
    pub fn string(self) -> u32 {
        self.string
    }

    pub fn fret(self) -> u32 {
        self.fret
    }

    /// Returns the same cell on another fret.
    pub(crate) fn with_fret(self, fret: u32) -> Self {
        Self { fret, ..self }
    }
}

impl fmt::Display for MarkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "string {}, fret {}", self.string, self.fret)
    }
}

/// The side of the grid a fret label is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FretLabelSide {
    Left,
    Right,
}

impl FretLabelSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

impl fmt::Display for FretLabelSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FretLabelSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(format!(
                "invalid fret label side `{s}`, valid values: Left, Right"
            )),
        }
    }
}

/// The placement of a fret label beside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FretLabelPosition {
    side: FretLabelSide,
    fret: u32,
}

impl FretLabelPosition {
    pub fn new(side: FretLabelSide, fret: u32) -> Self {
        Self { side, fret }
    }

    pub fn side(self) -> FretLabelSide {
        self.side
    }

    pub fn fret(self) -> u32 {
        self.fret
    }
}

impl fmt::Display for FretLabelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} side, fret {}", self.side, self.fret)
    }
}

/// The fret and string range spanned by a barre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarrePosition {
    fret: u32,
    start_string: u32,
    end_string: u32,
}

impl BarrePosition {
    pub fn new(fret: u32, start_string: u32, end_string: u32) -> Self {
        Self {
            fret,
            start_string,
            end_string,
        }
    }

    pub fn fret(self) -> u32 {
        self.fret
    }

    /// Returns the lower string of the span.
    pub fn start_string(self) -> u32 {
        self.start_string
    }

    /// Returns the upper string of the span.
    pub fn end_string(self) -> u32 {
        self.end_string
    }

    /// Returns `true` if both barres share a fret and their string ranges
    /// intersect.
    pub fn overlaps(self, other: BarrePosition) -> bool {
        self.fret == other.fret
            && self.start_string <= other.end_string
            && other.start_string <= self.end_string
    }

    /// Returns `true` if the barre spans `string` at `fret`.
    pub fn covers(self, fret: u32, string: u32) -> bool {
        self.fret == fret && (self.start_string..=self.end_string).contains(&string)
    }
}

impl fmt::Display for BarrePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fret {}, strings {}-{}",
            self.fret, self.start_string, self.end_string
        )
    }
}

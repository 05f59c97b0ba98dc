//! Enumerated style values.
//!
//! Every enum here is stored as text in a style level. [`FromStr`] accepts any
//! letter case and [`Display`](fmt::Display) writes the canonical PascalCase
//! name, which is also the spelling used in XML files.

use std::{fmt, str::FromStr};

macro_rules! style_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the canonical name of this variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant) ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| {
                        let valid: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        format!("invalid {} `{s}`, valid values: {}", $what, valid.join(", "))
                    })
            }
        }

        impl From<$name> for crate::style::StyleValue {
            fn from(value: $name) -> Self {
                crate::style::StyleValue::Text(value.as_str().to_string())
            }
        }

        impl crate::style::schema::PropertyValue for $name {
            fn read(
                key: &str,
                value: &crate::style::StyleValue,
            ) -> Result<Self, crate::error::StyleError> {
                value.to_enum(key)
            }
        }
    };
}

style_enum! {
    /// The kind of a mark, selecting which style key prefix applies to it.
    MarkType, "mark type" {
        #[default]
        Normal,
        Muted,
        Root,
        Open,
        OpenRoot,
        Bottom,
    }
}

impl MarkType {
    /// Returns the style key prefix for this mark type.
    ///
    /// [`MarkType::Normal`] has an empty prefix and uses the generic `mark.*`
    /// keys directly.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Normal => "",
            Self::Muted => "muted",
            Self::Root => "root",
            Self::Open => "open",
            Self::OpenRoot => "openroot",
            Self::Bottom => "bottom",
        }
    }
}

style_enum! {
    /// The vector shape drawn for a mark.
    MarkShape, "mark shape" {
        None,
        #[default]
        Circle,
        Square,
        Diamond,
        X,
    }
}

style_enum! {
    /// Whether extra canvas space is reserved for fret labels and the title.
    LabelLayoutModel, "label layout model" {
        Overlap,
        AddPaddingHorizontal,
        AddPaddingVertical,
        #[default]
        AddPaddingBoth,
    }
}

impl LabelLayoutModel {
    /// Returns `true` if space is reserved to the left and right of the grid.
    pub fn pads_horizontally(&self) -> bool {
        matches!(self, Self::AddPaddingHorizontal | Self::AddPaddingBoth)
    }

    /// Returns `true` if space is reserved above and below the grid.
    pub fn pads_vertically(&self) -> bool {
        matches!(self, Self::AddPaddingVertical | Self::AddPaddingBoth)
    }
}

style_enum! {
    /// Rendering orientation of the fretboard.
    Orientation, "orientation" {
        /// Strings run top to bottom, the nut is at the top.
        #[default]
        UpDown,
        /// The canvas is rotated by -90 degrees, the nut is on the left.
        LeftRight,
    }
}

style_enum! {
    /// Font weight and slant.
    TextStyle, "text style" {
        #[default]
        Regular,
        Bold,
        Italic,
        BoldItalic,
    }
}

impl TextStyle {
    /// Returns the CSS declarations for this text style.
    pub fn to_css(&self) -> &'static str {
        match self {
            Self::Regular => "",
            Self::Bold => "font-weight:bold;",
            Self::Italic => "font-style:italic;",
            Self::BoldItalic => "font-weight:bold;font-style:italic;",
        }
    }
}

style_enum! {
    /// Horizontal text alignment.
    TextAlignment, "text alignment" {
        Left,
        #[default]
        Center,
        Right,
    }
}

impl TextAlignment {
    /// Returns the SVG `text-anchor` value.
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Left => "start",
            Self::Center => "middle",
            Self::Right => "end",
        }
    }
}

style_enum! {
    /// Whether barres are drawn below or above the marks.
    BarreStack, "barre stack" {
        #[default]
        UnderMarks,
        OverMarks,
    }
}

style_enum! {
    /// Vertical placement of a barre within its fret row.
    BarreVerticalAlignment, "barre vertical alignment" {
        Top,
        #[default]
        Middle,
        Bottom,
    }
}

style_enum! {
    /// How the diagram title is typeset.
    TitleLabelStyle, "title label style" {
        #[default]
        Normal,
        /// The first character is drawn at full size and the rest as a
        /// smaller modifier, e.g. `C` + `maj7`.
        ChordName,
    }
}

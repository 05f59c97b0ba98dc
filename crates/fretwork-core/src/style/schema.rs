//! Typed view over a style level.
//!
//! [`DiagramStyle`] exposes every known style property as a getter, a
//! validating setter and an `*_is_local` query over one dotted key. Reads go
//! through the full cascade, writes always land on the wrapped level.
//!
//! Mark properties are keyed per [`MarkType`]. The generic key `mark.<leaf>`
//! applies to every mark, the typed key `<prefix>.<leaf>` (e.g. `root.color`)
//! overrides it for one type. [`MarkType::Normal`] has no prefix of its own.

use crate::{
    color::Color,
    error::StyleError,
    style::{
        BarreStack, BarreVerticalAlignment, LabelLayoutModel, MarkShape, MarkType, Orientation,
        StyleStore, StyleValue, TextAlignment, TextStyle, TitleLabelStyle,
    },
};

/// Namespace of the generic mark keys.
const MARK_NAMESPACE: &str = "mark";

/// Accepted range of a numeric property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Domain {
    Any,
    NonNegative,
    Positive,
    Unit,
}

impl Domain {
    fn check(self, key: &str, value: f64) -> Result<(), StyleError> {
        let (valid, expected) = match self {
            Self::Any => (value.is_finite(), "a finite number"),
            Self::NonNegative => (value.is_finite() && value >= 0.0, "a value >= 0"),
            Self::Positive => (value.is_finite() && value > 0.0, "a value > 0"),
            Self::Unit => ((0.0..=1.0).contains(&value), "a value between 0 and 1"),
        };
        if valid {
            Ok(())
        } else {
            Err(StyleError::OutOfRange {
                key: key.to_string(),
                value: value.to_string(),
                expected,
            })
        }
    }
}

/// A Rust type a style property can be read as and written from.
pub(crate) trait PropertyValue: Sized + Into<StyleValue> {
    fn read(key: &str, value: &StyleValue) -> Result<Self, StyleError>;

    fn validate(&self, _key: &str, _domain: Domain) -> Result<(), StyleError> {
        Ok(())
    }
}

impl PropertyValue for f64 {
    fn read(key: &str, value: &StyleValue) -> Result<Self, StyleError> {
        value.to_double(key)
    }

    fn validate(&self, key: &str, domain: Domain) -> Result<(), StyleError> {
        domain.check(key, *self)
    }
}

impl PropertyValue for bool {
    fn read(key: &str, value: &StyleValue) -> Result<Self, StyleError> {
        value.to_bool(key)
    }
}

impl PropertyValue for String {
    fn read(_key: &str, value: &StyleValue) -> Result<Self, StyleError> {
        Ok(value.to_string())
    }
}

impl PropertyValue for Color {
    fn read(_key: &str, value: &StyleValue) -> Result<Self, StyleError> {
        value.to_color()
    }
}

/// A typed handle to one style level.
///
/// Cloning the handle shares the level. Use [`DiagramStyle::duplicate`] for
/// an independent copy.
#[derive(Debug, Clone)]
pub struct DiagramStyle {
    store: StyleStore,
}

impl DiagramStyle {
    /// Create an empty level named `level` that inherits from `parent`.
    pub fn new(level: impl Into<String>, parent: &DiagramStyle) -> Self {
        Self {
            store: StyleStore::with_parent(level, &parent.store),
        }
    }

    /// Create an empty root level.
    pub fn root(level: impl Into<String>) -> Self {
        Self {
            store: StyleStore::new(level),
        }
    }

    /// Wrap an existing store handle.
    pub fn from_store(store: StyleStore) -> Self {
        Self { store }
    }

    /// Returns the underlying store handle.
    pub fn store(&self) -> &StyleStore {
        &self.store
    }

    /// Returns the parent level, if any.
    pub fn parent(&self) -> Option<DiagramStyle> {
        self.store.parent().map(Self::from_store)
    }

    /// Returns `true` if both handles refer to the same level.
    pub fn ptr_eq(&self, other: &DiagramStyle) -> bool {
        self.store.ptr_eq(&other.store)
    }

    /// Independent copy of this level's local entries, sharing the parent.
    pub fn duplicate(&self) -> DiagramStyle {
        Self::from_store(self.store.duplicate())
    }

    /// Independent copy of this level's local entries chained to `parent`.
    pub fn duplicate_with_parent(&self, parent: &DiagramStyle) -> DiagramStyle {
        Self::from_store(self.store.duplicate_with_parent(&parent.store))
    }

    /// Returns the key a mark property uses for `mark_type`.
    ///
    /// ```
    /// # use fretwork_core::style::{DiagramStyle, MarkType};
    /// assert_eq!(DiagramStyle::mark_style_key("color", MarkType::Root), "root.color");
    /// assert_eq!(DiagramStyle::mark_style_key("color", MarkType::Normal), "mark.color");
    /// ```
    pub fn mark_style_key(leaf: &str, mark_type: MarkType) -> String {
        match mark_type.prefix() {
            "" => format!("{MARK_NAMESPACE}.{leaf}"),
            prefix => format!("{prefix}.{leaf}"),
        }
    }

    /// Resolve the mark property `leaf` for `mark_type`.
    ///
    /// Each level is asked for the typed key first and the generic
    /// `mark.<leaf>` key second before the lookup moves on to the parent. A
    /// generic value on a nearer level therefore beats a typed value on a
    /// farther one.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::KeyNotFound`] if neither key exists at any level.
    pub fn mark_style_get(&self, leaf: &str, mark_type: MarkType) -> Result<StyleValue, StyleError> {
        let typed = Self::mark_style_key(leaf, mark_type);
        let generic = format!("{MARK_NAMESPACE}.{leaf}");
        self.store
            .resolve_first(&[typed.as_str(), generic.as_str()])
            .ok_or(StyleError::KeyNotFound(typed))
    }

    /// Build an SVG `style` attribute from `(key, css property)` pairs.
    ///
    /// With a non-empty `prefix` the prefixed form of each key (the key's
    /// namespace replaced by `prefix`) is tried before the key itself, level
    /// by level. Pairs that resolve nowhere are skipped.
    ///
    /// Values are formatted by property:
    /// - a `*textstyle` key with an empty property expands to `font-weight` /
    ///   `font-style` declarations
    /// - `font-size` is written in points
    /// - `text-anchor` maps Left/Center/Right to start/middle/end
    /// - `fill` and `stroke` are lower-cased
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::InvalidValue`] if a text style or alignment value
    /// cannot be parsed.
    pub fn get_svg_style(
        &self,
        style_map: &[(&str, &str)],
        prefix: &str,
    ) -> Result<String, StyleError> {
        let mut css = String::new();
        for &(key, property) in style_map {
            let prefixed = prefixed_key(prefix, key);
            let value = match &prefixed {
                Some(prefixed) => self.store.resolve_first(&[prefixed.as_str(), key]),
                None => self.store.resolve_first(&[key]),
            };
            let Some(value) = value else {
                continue;
            };

            match property {
                "" if key.ends_with("textstyle") => {
                    css.push_str(value.to_enum::<TextStyle>(key)?.to_css());
                }
                "font-size" => {
                    css.push_str(&format!("font-size:{value}pt;"));
                }
                "text-anchor" => {
                    let alignment = value.to_enum::<TextAlignment>(key)?;
                    css.push_str(&format!("text-anchor:{};", alignment.to_svg_value()));
                }
                "fill" | "stroke" => {
                    css.push_str(&format!("{property}:{};", value.to_string().to_lowercase()));
                }
                _ => {
                    css.push_str(&format!("{property}:{value};"));
                }
            }
        }
        Ok(css)
    }

    /// Check `value` against the type and range of the property stored under
    /// `key`, as the typed setter would. Keys outside the schema are accepted
    /// unchecked.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::OutOfRange`], [`StyleError::InvalidValue`] or
    /// [`StyleError::InvalidColor`] for a value the setter would reject.
    pub fn validate_entry(key: &str, value: &StyleValue) -> Result<(), StyleError> {
        let key = key.trim();
        if let Some(result) = Self::check_property(key, value) {
            return result;
        }
        match key.split_once('.') {
            Some((namespace, leaf)) if is_mark_namespace(namespace) => {
                Self::check_mark_property(key, leaf, value).unwrap_or(Ok(()))
            }
            _ => Ok(()),
        }
    }

    /// Validate a batch of entries and store it on this level.
    ///
    /// Nothing is stored unless every entry passes [`Self::validate_entry`].
    pub fn import_entries<I, K, V>(&self, entries: I) -> Result<(), StyleError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<StyleValue>,
    {
        let entries: Vec<(String, StyleValue)> = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        for (key, value) in &entries {
            Self::validate_entry(key, value)?;
        }
        self.store.import_entries(entries)
    }

    /// Font of the title, `diagram.fontfamily` when `title.textfont` is blank.
    pub fn title_font(&self) -> Result<String, StyleError> {
        let font = self.title_text_font()?;
        self.font_or_family(font)
    }

    /// Font of the fret labels, `diagram.fontfamily` when
    /// `fretlabel.textfont` is blank.
    pub fn fret_label_font(&self) -> Result<String, StyleError> {
        let font = self.fret_label_text_font()?;
        self.font_or_family(font)
    }

    /// Font of the text of `mark_type` marks, `diagram.fontfamily` when the
    /// resolved mark font is blank.
    pub fn mark_font(&self, mark_type: MarkType) -> Result<String, StyleError> {
        let font = self.mark_text_font(mark_type)?;
        self.font_or_family(font)
    }

    fn font_or_family(&self, font: String) -> Result<String, StyleError> {
        if font.trim().is_empty() {
            self.font_family()
        } else {
            Ok(font)
        }
    }

    /// Every key holding a color, generic mark keys included.
    pub fn color_keys() -> &'static [&'static str] {
        &[
            "diagram.color",
            "diagram.bordercolor",
            "grid.color",
            "grid.linecolor",
            "title.textcolor",
            "fretlabel.textcolor",
            "barre.color",
            "barre.linecolor",
            "mark.color",
            "mark.bordercolor",
            "mark.textcolor",
        ]
    }
}

/// Replace the namespace of `key` with `prefix`.
fn prefixed_key(prefix: &str, key: &str) -> Option<String> {
    if prefix.is_empty() {
        return None;
    }
    let leaf = key.split_once('.').map_or(key, |(_, leaf)| leaf);
    Some(format!("{prefix}.{leaf}"))
}

/// Parse `value` as the property's type and check its range.
fn check_value<T: PropertyValue>(
    key: &str,
    value: &StyleValue,
    domain: Domain,
) -> Result<(), StyleError> {
    T::read(key, value)?.validate(key, domain)
}

/// Returns `true` if `namespace` holds mark properties.
fn is_mark_namespace(namespace: &str) -> bool {
    namespace == MARK_NAMESPACE
        || MarkType::ALL
            .iter()
            .any(|mark_type| !mark_type.prefix().is_empty() && mark_type.prefix() == namespace)
}

macro_rules! style_properties {
    (
        $(
            $(#[$meta:meta])*
            $key:literal => $get:ident, $set:ident, $is_local:ident: $ty:ty, $domain:ident;
        )+
    ) => {
        impl DiagramStyle {
            /// Every non-mark property key.
            pub const KEYS: &'static [&'static str] = &[$($key),+];

            fn check_property(key: &str, value: &StyleValue) -> Option<Result<(), StyleError>> {
                match key {
                    $( $key => Some(check_value::<$ty>($key, value, Domain::$domain)), )+
                    _ => None,
                }
            }

            $(
                $(#[$meta])*
                #[doc = concat!("\n\nResolves `", $key, "`.")]
                pub fn $get(&self) -> Result<$ty, StyleError> {
                    <$ty as PropertyValue>::read($key, &self.store.get($key)?)
                }

                #[doc = concat!("Set `", $key, "` on this level.")]
                pub fn $set(&self, value: impl Into<$ty>) -> Result<(), StyleError> {
                    let value: $ty = value.into();
                    value.validate($key, Domain::$domain)?;
                    self.store.set($key, value)
                }

                #[doc = concat!("Returns `true` if `", $key, "` is set on this level.")]
                pub fn $is_local(&self) -> bool {
                    self.store.is_local($key)
                }
            )+
        }
    };
}

macro_rules! mark_style_properties {
    (
        $(
            $(#[$meta:meta])*
            $leaf:literal => $get:ident, $set:ident, $is_local:ident: $ty:ty, $domain:ident;
        )+
    ) => {
        impl DiagramStyle {
            /// Leaf names of every mark property.
            pub const MARK_LEAVES: &'static [&'static str] = &[$($leaf),+];

            fn check_mark_property(
                key: &str,
                leaf: &str,
                value: &StyleValue,
            ) -> Option<Result<(), StyleError>> {
                match leaf {
                    $( $leaf => Some(check_value::<$ty>(key, value, Domain::$domain)), )+
                    _ => None,
                }
            }

            $(
                $(#[$meta])*
                #[doc = concat!("\n\nResolves `<prefix>.", $leaf, "`, then `mark.", $leaf, "`.")]
                pub fn $get(&self, mark_type: MarkType) -> Result<$ty, StyleError> {
                    let value = self.mark_style_get($leaf, mark_type)?;
                    <$ty as PropertyValue>::read(&Self::mark_style_key($leaf, mark_type), &value)
                }

                #[doc = concat!("Set `", $leaf, "` for `mark_type` on this level.")]
                pub fn $set(
                    &self,
                    mark_type: MarkType,
                    value: impl Into<$ty>,
                ) -> Result<(), StyleError> {
                    let key = Self::mark_style_key($leaf, mark_type);
                    let value: $ty = value.into();
                    value.validate(&key, Domain::$domain)?;
                    self.store.set(&key, value)
                }

                #[doc = concat!("Returns `true` if `", $leaf, "` for `mark_type` is set on this level.")]
                pub fn $is_local(&self, mark_type: MarkType) -> bool {
                    self.store.is_local(&Self::mark_style_key($leaf, mark_type))
                }
            )+
        }
    };
}

style_properties! {
    /// Space above the grid.
    "diagram.margintop" => margin_top, set_margin_top, margin_top_is_local: f64, NonNegative;
    /// Space below the grid.
    "diagram.marginbottom" => margin_bottom, set_margin_bottom, margin_bottom_is_local: f64, NonNegative;
    /// Space left of the grid.
    "diagram.marginleft" => margin_left, set_margin_left, margin_left_is_local: f64, NonNegative;
    /// Space right of the grid.
    "diagram.marginright" => margin_right, set_margin_right, margin_right_is_local: f64, NonNegative;
    /// Canvas background color.
    "diagram.color" => background_color, set_background_color, background_color_is_local: Color, Any;
    "diagram.opacity" => background_opacity, set_background_opacity, background_opacity_is_local: f64, Unit;
    "diagram.bordercolor" => border_color, set_border_color, border_color_is_local: Color, Any;
    /// Canvas border width; zero draws no border.
    "diagram.borderthickness" => border_thickness, set_border_thickness, border_thickness_is_local: f64, NonNegative;
    /// Font used by every text whose own font key is blank.
    "diagram.fontfamily" => font_family, set_font_family, font_family_is_local: String, Any;
    "diagram.labellayoutmodel" => label_layout_model, set_label_layout_model, label_layout_model_is_local: LabelLayoutModel, Any;
    "diagram.orientation" => orientation, set_orientation, orientation_is_local: Orientation, Any;

    /// Distance between two adjacent strings.
    "grid.stringspacing" => string_spacing, set_string_spacing, string_spacing_is_local: f64, Positive;
    /// Distance between two adjacent frets.
    "grid.fretspacing" => fret_spacing, set_fret_spacing, fret_spacing_is_local: f64, Positive;
    "grid.color" => grid_color, set_grid_color, grid_color_is_local: Color, Any;
    "grid.opacity" => grid_opacity, set_grid_opacity, grid_opacity_is_local: f64, Unit;
    "grid.linecolor" => grid_line_color, set_grid_line_color, grid_line_color_is_local: Color, Any;
    "grid.linethickness" => grid_line_thickness, set_grid_line_thickness, grid_line_thickness_is_local: f64, NonNegative;
    "grid.nutvisible" => nut_visible, set_nut_visible, nut_visible_is_local: bool, Any;
    /// Nut width as a multiple of the grid line thickness.
    "grid.nutratio" => nut_ratio, set_nut_ratio, nut_ratio_is_local: f64, NonNegative;

    "title.visible" => title_visible, set_title_visible, title_visible_is_local: bool, Any;
    /// Title font size in points.
    "title.textsize" => title_text_size, set_title_text_size, title_text_size_is_local: f64, NonNegative;
    /// Size of the chord modifier relative to the title size.
    "title.textsizemodratio" => title_text_size_mod_ratio, set_title_text_size_mod_ratio, title_text_size_mod_ratio_is_local: f64, Unit;
    "title.textfont" => title_text_font, set_title_text_font, title_text_font_is_local: String, Any;
    "title.textstyle" => title_text_style, set_title_text_style, title_text_style_is_local: TextStyle, Any;
    "title.textalignment" => title_text_alignment, set_title_text_alignment, title_text_alignment_is_local: TextAlignment, Any;
    "title.textcolor" => title_text_color, set_title_text_color, title_text_color_is_local: Color, Any;
    "title.textopacity" => title_text_opacity, set_title_text_opacity, title_text_opacity_is_local: f64, Unit;
    /// Gap between the title baseline and the grid.
    "title.gridpadding" => title_grid_padding, set_title_grid_padding, title_grid_padding_is_local: f64, NonNegative;
    "title.labelstyle" => title_label_style, set_title_label_style, title_label_style_is_local: TitleLabelStyle, Any;

    "fretlabel.textvisible" => fret_label_text_visible, set_fret_label_text_visible, fret_label_text_visible_is_local: bool, Any;
    /// Font size relative to the fret spacing.
    "fretlabel.textsizeratio" => fret_label_text_size_ratio, set_fret_label_text_size_ratio, fret_label_text_size_ratio_is_local: f64, Unit;
    "fretlabel.textfont" => fret_label_text_font, set_fret_label_text_font, fret_label_text_font_is_local: String, Any;
    "fretlabel.textstyle" => fret_label_text_style, set_fret_label_text_style, fret_label_text_style_is_local: TextStyle, Any;
    "fretlabel.textcolor" => fret_label_text_color, set_fret_label_text_color, fret_label_text_color_is_local: Color, Any;
    "fretlabel.textopacity" => fret_label_text_opacity, set_fret_label_text_opacity, fret_label_text_opacity_is_local: f64, Unit;
    /// Gap between a fret label and the grid.
    "fretlabel.gridpadding" => fret_label_grid_padding, set_fret_label_grid_padding, fret_label_grid_padding_is_local: f64, NonNegative;
    /// Estimated glyph width relative to the font size.
    "fretlabel.textwidthratio" => fret_label_text_width_ratio, set_fret_label_text_width_ratio, fret_label_text_width_ratio_is_local: f64, Unit;

    "barre.visible" => barre_visible, set_barre_visible, barre_visible_is_local: bool, Any;
    "barre.verticalalignment" => barre_vertical_alignment, set_barre_vertical_alignment, barre_vertical_alignment_is_local: BarreVerticalAlignment, Any;
    "barre.stack" => barre_stack, set_barre_stack, barre_stack_is_local: BarreStack, Any;
    /// Arc height relative to the fret spacing; zero draws a straight line.
    "barre.arcratio" => barre_arc_ratio, set_barre_arc_ratio, barre_arc_ratio_is_local: f64, Unit;
    "barre.color" => barre_color, set_barre_color, barre_color_is_local: Color, Any;
    "barre.opacity" => barre_opacity, set_barre_opacity, barre_opacity_is_local: f64, Unit;
    "barre.linecolor" => barre_line_color, set_barre_line_color, barre_line_color_is_local: Color, Any;
    "barre.linethickness" => barre_line_thickness, set_barre_line_thickness, barre_line_thickness_is_local: f64, NonNegative;
}

mark_style_properties! {
    "shape" => mark_shape, set_mark_shape, mark_shape_is_local: MarkShape, Any;
    "visible" => mark_visible, set_mark_visible, mark_visible_is_local: bool, Any;
    "color" => mark_color, set_mark_color, mark_color_is_local: Color, Any;
    "opacity" => mark_opacity, set_mark_opacity, mark_opacity_is_local: f64, Unit;
    /// Mark radius relative to half the smaller grid spacing.
    "radiusratio" => mark_radius_ratio, set_mark_radius_ratio, mark_radius_ratio_is_local: f64, Unit;
    "bordercolor" => mark_border_color, set_mark_border_color, mark_border_color_is_local: Color, Any;
    "borderthickness" => mark_border_thickness, set_mark_border_thickness, mark_border_thickness_is_local: f64, NonNegative;
    "textvisible" => mark_text_visible, set_mark_text_visible, mark_text_visible_is_local: bool, Any;
    /// Font size relative to the mark diameter.
    "textsizeratio" => mark_text_size_ratio, set_mark_text_size_ratio, mark_text_size_ratio_is_local: f64, Unit;
    "textfont" => mark_text_font, set_mark_text_font, mark_text_font_is_local: String, Any;
    "textstyle" => mark_text_style, set_mark_text_style, mark_text_style_is_local: TextStyle, Any;
    "textalignment" => mark_text_alignment, set_mark_text_alignment, mark_text_alignment_is_local: TextAlignment, Any;
    "textcolor" => mark_text_color, set_mark_text_color, mark_text_color_is_local: Color, Any;
    "textopacity" => mark_text_opacity, set_mark_text_opacity, mark_text_opacity_is_local: f64, Unit;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::NamedColor;

    fn chained() -> (DiagramStyle, DiagramStyle) {
        let parent = DiagramStyle::root("collection");
        let child = DiagramStyle::new("diagram", &parent);
        (parent, child)
    }

    #[test]
    fn test_typed_key_beats_generic_key() {
        let style = DiagramStyle::root("diagram");
        style.set_mark_color(MarkType::Root, NamedColor::Red).unwrap();
        style.set_mark_color(MarkType::Normal, NamedColor::Blue).unwrap();

        assert_eq!(style.mark_color(MarkType::Root).unwrap().to_string(), "Red");
        assert_eq!(style.mark_color(MarkType::Muted).unwrap().to_string(), "Blue");
        assert_eq!(style.mark_color(MarkType::Normal).unwrap().to_string(), "Blue");
    }

    #[test]
    fn test_mark_lookup_is_two_tier_per_level() {
        let (parent, child) = chained();
        parent.set_mark_color(MarkType::Root, NamedColor::Green).unwrap();
        child.set_mark_color(MarkType::Normal, NamedColor::Blue).unwrap();

        // The nearer generic key wins over the farther typed key
        assert_eq!(child.mark_color(MarkType::Root).unwrap().to_string(), "Blue");

        child.store().clear("mark.color").unwrap();
        assert_eq!(child.mark_color(MarkType::Root).unwrap().to_string(), "Green");
    }

    #[test]
    fn test_mark_lookup_missing_everywhere() {
        let (_, child) = chained();
        let err = child.mark_shape(MarkType::Open).unwrap_err();
        assert_eq!(err, StyleError::KeyNotFound("open.shape".to_string()));
    }

    #[test]
    fn test_setter_domains() {
        let style = DiagramStyle::root("diagram");
        assert!(matches!(
            style.set_grid_opacity(1.5),
            Err(StyleError::OutOfRange { .. })
        ));
        assert!(matches!(
            style.set_string_spacing(0.0),
            Err(StyleError::OutOfRange { .. })
        ));
        assert!(matches!(
            style.set_margin_left(-1.0),
            Err(StyleError::OutOfRange { .. })
        ));
        assert!(matches!(
            style.set_mark_radius_ratio(MarkType::Root, f64::NAN),
            Err(StyleError::OutOfRange { .. })
        ));
        assert!(style.store().is_empty());

        style.set_margin_left(0.0).unwrap();
        style.set_grid_opacity(1.0).unwrap();
        assert!(style.margin_left_is_local());
    }

    #[test]
    fn test_is_local_ignores_ancestors() {
        let (parent, child) = chained();
        parent.set_fret_spacing(25.0).unwrap();
        assert_eq!(child.fret_spacing().unwrap(), 25.0);
        assert!(!child.fret_spacing_is_local());
        assert!(parent.fret_spacing_is_local());

        child.set_mark_opacity(MarkType::Muted, 0.5).unwrap();
        assert!(child.mark_opacity_is_local(MarkType::Muted));
        assert!(!child.mark_opacity_is_local(MarkType::Normal));
    }

    #[test]
    fn test_color_setters_normalize() {
        let style = DiagramStyle::root("diagram");
        style.set_grid_color(Color::new("#abc").unwrap()).unwrap();
        assert_eq!(style.store().get_string("grid.color").unwrap(), "#AABBCC");
    }

    #[test]
    fn test_raw_values_parse_lazily() {
        let style = DiagramStyle::root("diagram");
        style.store().set("diagram.orientation", "leftright").unwrap();
        style.store().set("grid.nutvisible", "False").unwrap();
        assert_eq!(style.orientation().unwrap(), Orientation::LeftRight);
        assert!(!style.nut_visible().unwrap());

        style.store().set("barre.stack", "sideways").unwrap();
        assert!(matches!(
            style.barre_stack(),
            Err(StyleError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_svg_style_formatting() {
        let style = DiagramStyle::root("diagram");
        style.set_title_text_style(TextStyle::Bold).unwrap();
        style.set_title_text_size(20.0).unwrap();
        style.set_title_text_alignment(TextAlignment::Left).unwrap();
        style.set_title_text_color(NamedColor::Red).unwrap();
        style.set_title_text_opacity(0.5).unwrap();

        let css = style
            .get_svg_style(
                &[
                    ("title.textstyle", ""),
                    ("title.textsize", "font-size"),
                    ("title.textalignment", "text-anchor"),
                    ("title.textcolor", "fill"),
                    ("title.textopacity", "fill-opacity"),
                    ("title.textfont", "font-family"),
                ],
                "",
            )
            .unwrap();
        assert_eq!(
            css,
            "font-weight:bold;font-size:20pt;text-anchor:start;fill:red;fill-opacity:0.5;"
        );
    }

    #[test]
    fn test_svg_style_prefix_replaces_mark_namespace() {
        let (parent, child) = chained();
        parent.set_mark_color(MarkType::Normal, NamedColor::Black).unwrap();
        parent.set_mark_color(MarkType::Root, NamedColor::Navy).unwrap();
        child.set_mark_opacity(MarkType::Normal, 0.25).unwrap();

        let map = [("mark.color", "fill"), ("mark.opacity", "fill-opacity")];
        assert_eq!(
            child.get_svg_style(&map, "root").unwrap(),
            "fill:navy;fill-opacity:0.25;"
        );
        assert_eq!(
            child.get_svg_style(&map, "").unwrap(),
            "fill:black;fill-opacity:0.25;"
        );
    }

    #[test]
    fn test_svg_style_rejects_bad_alignment() {
        let style = DiagramStyle::root("diagram");
        style.store().set("title.textalignment", "justify").unwrap();
        assert!(
            style
                .get_svg_style(&[("title.textalignment", "text-anchor")], "")
                .is_err()
        );
    }

    #[test]
    fn test_duplicate_shares_parent_only() {
        let (parent, child) = chained();
        child.set_nut_ratio(3.0).unwrap();

        let copy = child.duplicate();
        assert!(!copy.ptr_eq(&child));
        assert!(copy.parent().unwrap().ptr_eq(&parent));
        assert_eq!(copy.nut_ratio().unwrap(), 3.0);

        copy.set_nut_ratio(4.0).unwrap();
        assert_eq!(child.nut_ratio().unwrap(), 3.0);
    }

    #[test]
    fn test_key_tables() {
        assert_eq!(DiagramStyle::KEYS.len(), 45);
        assert_eq!(DiagramStyle::MARK_LEAVES.len(), 14);
        for key in DiagramStyle::color_keys() {
            let known = DiagramStyle::KEYS.contains(key)
                || key
                    .strip_prefix("mark.")
                    .is_some_and(|leaf| DiagramStyle::MARK_LEAVES.contains(&leaf));
            assert!(known, "{key} is not a schema key");
        }
    }

    #[test]
    fn test_validate_entry_matches_setters() {
        let text = |value: &str| StyleValue::from(value);
        assert!(matches!(
            DiagramStyle::validate_entry("grid.stringspacing", &text("-50")),
            Err(StyleError::OutOfRange { .. })
        ));
        assert!(matches!(
            DiagramStyle::validate_entry("grid.fretspacing", &StyleValue::from(0.0)),
            Err(StyleError::OutOfRange { .. })
        ));
        assert!(matches!(
            DiagramStyle::validate_entry("root.radiusratio", &text("1.5")),
            Err(StyleError::OutOfRange { .. })
        ));
        assert!(matches!(
            DiagramStyle::validate_entry("mark.opacity", &text("half")),
            Err(StyleError::InvalidValue { .. })
        ));
        assert!(DiagramStyle::validate_entry("barre.color", &text("plaid")).is_err());
        assert!(DiagramStyle::validate_entry("diagram.orientation", &text("Sideways")).is_err());

        assert!(DiagramStyle::validate_entry("grid.stringspacing", &text("24")).is_ok());
        assert!(DiagramStyle::validate_entry("openroot.shape", &text("diamond")).is_ok());
        assert!(DiagramStyle::validate_entry("grid.nutvisible", &text("False")).is_ok());
        // Keys outside the schema are kept verbatim
        assert!(DiagramStyle::validate_entry("custom.spacing", &text("-1")).is_ok());
        assert!(DiagramStyle::validate_entry("root.unknownleaf", &text("-1")).is_ok());
    }

    #[test]
    fn test_defaults_pass_validation() {
        let defaults = DiagramStyle::defaults();
        for (key, value) in defaults.store().local_entries() {
            assert!(
                DiagramStyle::validate_entry(&key, &value).is_ok(),
                "default {key} = {value} is invalid"
            );
        }
    }

    #[test]
    fn test_import_entries_is_all_or_nothing() {
        let style = DiagramStyle::root("diagram");
        let result = style.import_entries([
            ("grid.stringspacing", StyleValue::from("24")),
            ("grid.fretspacing", StyleValue::from("-3")),
        ]);
        assert!(matches!(result, Err(StyleError::OutOfRange { .. })));
        assert!(style.store().is_empty());

        style
            .import_entries([
                ("grid.stringspacing", StyleValue::from("24")),
                ("custom.key", StyleValue::from("kept")),
            ])
            .unwrap();
        assert_eq!(style.string_spacing().unwrap(), 24.0);
        assert_eq!(style.store().local_keys(), vec!["grid.stringspacing", "custom.key"]);
    }

    #[test]
    fn test_blank_text_font_falls_back_to_font_family() {
        let (parent, child) = chained();
        parent.set_font_family("monospace").unwrap();
        parent.set_title_text_font("").unwrap();
        parent.set_fret_label_text_font(" ").unwrap();
        parent.set_mark_text_font(MarkType::Normal, "").unwrap();

        assert_eq!(child.title_font().unwrap(), "monospace");
        assert_eq!(child.fret_label_font().unwrap(), "monospace");
        assert_eq!(child.mark_font(MarkType::Root).unwrap(), "monospace");

        child.set_title_text_font("Arial").unwrap();
        child.set_mark_text_font(MarkType::Root, "Courier").unwrap();
        assert_eq!(child.title_font().unwrap(), "Arial");
        assert_eq!(child.mark_font(MarkType::Root).unwrap(), "Courier");
        assert_eq!(child.mark_font(MarkType::Muted).unwrap(), "monospace");
    }
}

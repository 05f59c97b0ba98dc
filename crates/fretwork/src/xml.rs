//! XML reading and writing of diagrams.
//!
//! ```xml
//! <diagram title="C" strings="6" frets="5">
//!   <mark text="1" type="Root" string="5" fret="3">
//!     <style>
//!       <setting key="root.color" value="Red"/>
//!     </style>
//!   </mark>
//!   <barre text="" fret="1" start="1" end="6"/>
//!   <fretlabel text="3" side="Left" fret="1"/>
//!   <style>
//!     <setting key="grid.stringspacing" value="30"/>
//!   </style>
//! </diagram>
//! ```
//!
//! Reading parses the whole document first and then builds the diagram
//! through the same validating operations an editor would use, so a file can
//! never produce a diagram that breaks the model's invariants. Style settings
//! are kept as text, but known keys must hold a value their typed setter
//! would accept. Unknown keys survive a round trip untouched.

use std::str::FromStr;

use log::{debug, warn};
use roxmltree::{Document, Node};

use fretwork_core::style::{DiagramStyle, MarkType, StyleValue};

use crate::{
    diagram::{BarrePosition, Diagram, FretLabelPosition, FretLabelSide, MarkPosition},
    error::FretworkError,
};

const INDENT: &str = "  ";

impl Diagram {
    /// Read a diagram from XML, chaining its style to `parent`.
    pub fn from_xml(source: &str, parent: &DiagramStyle) -> Result<Diagram, FretworkError> {
        read_diagram(source, parent)
    }

    /// Serialize the diagram to XML.
    pub fn to_xml(&self) -> String {
        write_diagram(self)
    }
}

/// Read a diagram from XML, chaining its style to `parent`.
///
/// # Errors
///
/// Returns [`FretworkError::Xml`] if the text is not well-formed XML,
/// [`FretworkError::MalformedXml`] if required attributes are missing or
/// invalid, and the model's own errors for elements that cannot be placed.
pub fn read_diagram(source: &str, parent: &DiagramStyle) -> Result<Diagram, FretworkError> {
    let document =
        Document::parse(source).map_err(|err| FretworkError::new_xml_error(err, source))?;
    let root = document.root_element();
    if root.tag_name().name() != "diagram" {
        return Err(malformed(
            &document,
            root,
            format!("expected <diagram>, found <{}>", root.tag_name().name()),
        ));
    }

    let strings = parse_attribute::<u32>(&document, root, "strings")?;
    let frets = parse_attribute::<u32>(&document, root, "frets")?;
    let mut diagram = Diagram::new(parent, strings, frets)?;
    diagram.set_title(root.attribute("title").map(str::to_string));

    for child in root.children().filter(Node::is_element) {
        match child.tag_name().name() {
            "mark" => {
                let position = MarkPosition::new(
                    parse_attribute(&document, child, "string")?,
                    parse_attribute(&document, child, "fret")?,
                );
                let mark_type = match child.attribute("type") {
                    Some(_) => parse_attribute::<MarkType>(&document, child, "type")?,
                    None => MarkType::Normal,
                };
                let mark = diagram.new_mark(position, mark_type, text_attribute(child))?;
                read_element_style(&document, child, mark.style())?;
            }
            "barre" => {
                let position = BarrePosition::new(
                    parse_attribute(&document, child, "fret")?,
                    parse_attribute(&document, child, "start")?,
                    parse_attribute(&document, child, "end")?,
                );
                let barre = diagram.new_barre(position, text_attribute(child))?;
                read_element_style(&document, child, barre.style())?;
            }
            "fretlabel" => {
                let position = FretLabelPosition::new(
                    parse_attribute::<FretLabelSide>(&document, child, "side")?,
                    parse_attribute(&document, child, "fret")?,
                );
                let label = diagram.new_fret_label(position, text_attribute(child))?;
                read_element_style(&document, child, label.style())?;
            }
            "style" => read_style(&document, child, diagram.style())?,
            other => {
                warn!(element = other; "Skipping unknown diagram element");
            }
        }
    }

    debug!(
        strings,
        frets,
        marks = diagram.marks().len(),
        barres = diagram.barres().len(),
        fret_labels = diagram.fret_labels().len();
        "Read diagram from XML"
    );
    Ok(diagram)
}

/// Serialize a diagram to XML.
///
/// The diagram always ends with exactly one `<style>` element, elements only
/// carry one when they have local style entries.
pub fn write_diagram(diagram: &Diagram) -> String {
    let mut out = String::from("<diagram");
    if let Some(title) = diagram.title() {
        push_attribute(&mut out, "title", title);
    }
    push_attribute(&mut out, "strings", &diagram.num_strings().to_string());
    push_attribute(&mut out, "frets", &diagram.num_frets().to_string());
    out.push_str(">\n");

    for mark in diagram.marks() {
        let position = mark.position();
        write_element(
            &mut out,
            "mark",
            &[
                ("text", mark.text().to_string()),
                ("type", mark.mark_type().to_string()),
                ("string", position.string().to_string()),
                ("fret", position.fret().to_string()),
            ],
            mark.style(),
        );
    }
    for barre in diagram.barres() {
        let position = barre.position();
        write_element(
            &mut out,
            "barre",
            &[
                ("text", barre.text().to_string()),
                ("fret", position.fret().to_string()),
                ("start", position.start_string().to_string()),
                ("end", position.end_string().to_string()),
            ],
            barre.style(),
        );
    }
    for label in diagram.fret_labels() {
        let position = label.position();
        write_element(
            &mut out,
            "fretlabel",
            &[
                ("text", label.text().to_string()),
                ("side", position.side().to_string()),
                ("fret", position.fret().to_string()),
            ],
            label.style(),
        );
    }

    write_style(&mut out, diagram.style(), 1);
    out.push_str("</diagram>\n");
    out
}

fn write_element(out: &mut String, name: &str, attributes: &[(&str, String)], style: &DiagramStyle) {
    out.push_str(INDENT);
    out.push('<');
    out.push_str(name);
    for (key, value) in attributes {
        push_attribute(out, key, value);
    }
    if style.store().is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");
    write_style(out, style, 2);
    out.push_str(&format!("{INDENT}</{name}>\n"));
}

fn write_style(out: &mut String, style: &DiagramStyle, depth: usize) {
    let indent = INDENT.repeat(depth);
    let entries = style.store().local_entries();
    if entries.is_empty() {
        out.push_str(&format!("{indent}<style/>\n"));
        return;
    }
    out.push_str(&format!("{indent}<style>\n"));
    for (key, value) in entries {
        out.push_str(&indent);
        out.push_str(INDENT);
        out.push_str("<setting");
        push_attribute(out, "key", &key);
        push_attribute(out, "value", &value.to_string());
        out.push_str("/>\n");
    }
    out.push_str(&format!("{indent}</style>\n"));
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_xml(value));
    out.push('"');
}

/// XML 1.0 valid char ranges:
/// - 0x09, 0x0A, 0x0D
/// - 0x20..=0xD7FF
/// - 0xE000..=0xFFFD
/// - 0x10000..=0x10FFFF
fn is_valid_xml_char(c: char) -> bool {
    matches!(
        c as u32,
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    )
}

/// Escape text for use in an attribute value, dropping characters XML
/// cannot represent.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if !is_valid_xml_char(c) {
            continue;
        }
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn text_attribute(node: Node<'_, '_>) -> String {
    node.attribute("text").unwrap_or_default().to_string()
}

fn parse_attribute<T>(
    document: &Document<'_>,
    node: Node<'_, '_>,
    name: &str,
) -> Result<T, FretworkError>
where
    T: FromStr,
    T::Err: ToString,
{
    let raw = node.attribute(name).ok_or_else(|| {
        malformed(
            document,
            node,
            format!("<{}> is missing the `{name}` attribute", node.tag_name().name()),
        )
    })?;
    raw.trim().parse().map_err(|err: T::Err| {
        malformed(
            document,
            node,
            format!(
                "invalid `{name}` value `{raw}` on <{}>: {}",
                node.tag_name().name(),
                err.to_string()
            ),
        )
    })
}

/// Read the optional `<style>` child of an element.
fn read_element_style(
    document: &Document<'_>,
    node: Node<'_, '_>,
    style: &DiagramStyle,
) -> Result<(), FretworkError> {
    for child in node
        .children()
        .filter(|child| child.has_tag_name("style"))
    {
        read_style(document, child, style)?;
    }
    Ok(())
}

/// Import the `<setting>` children of a `<style>` element in one batch.
fn read_style(
    document: &Document<'_>,
    node: Node<'_, '_>,
    style: &DiagramStyle,
) -> Result<(), FretworkError> {
    let mut entries = Vec::new();
    for setting in node.children().filter(Node::is_element) {
        if !setting.has_tag_name("setting") {
            warn!(element = setting.tag_name().name(); "Skipping unknown style element");
            continue;
        }
        let key = parse_attribute::<String>(document, setting, "key")?;
        let value = setting.attribute("value").ok_or_else(|| {
            malformed(
                document,
                setting,
                format!("setting `{key}` is missing the `value` attribute"),
            )
        })?;
        entries.push((key, StyleValue::from(value)));
    }
    style.import_entries(entries)?;
    Ok(())
}

fn malformed(document: &Document<'_>, node: Node<'_, '_>, message: String) -> FretworkError {
    let position = document.text_pos_at(node.range().start);
    FretworkError::MalformedXml(format!(
        "{message} (line {}, column {})",
        position.row, position.col
    ))
}

#[cfg(test)]
mod tests {
    use fretwork_core::{
        color::NamedColor,
        style::{StyleError, TitleLabelStyle},
    };

    use super::*;

    const CHORD: &str = r#"<diagram title="C" strings="6" frets="5">
  <mark text="1" type="root" string="5" fret="3">
    <style>
      <setting key="root.color" value="Red"/>
    </style>
  </mark>
  <mark string="1" fret="0" type="OPEN"/>
  <barre text="" fret="1" start="1" end="2"/>
  <fretlabel text="3" side="left" fret="3"/>
  <style>
    <setting key="grid.stringspacing" value="32"/>
    <setting key="custom.unknown" value="kept as is"/>
  </style>
</diagram>
"#;

    fn read(source: &str) -> Result<Diagram, FretworkError> {
        read_diagram(source, &DiagramStyle::defaults())
    }

    #[test]
    fn test_read_chord() {
        let diagram = read(CHORD).unwrap();
        assert_eq!(diagram.title(), Some("C"));
        assert_eq!(diagram.num_strings(), 6);
        assert_eq!(diagram.num_frets(), 5);
        assert_eq!(diagram.marks().len(), 2);

        let root = diagram.mark_at(MarkPosition::new(5, 3)).unwrap();
        assert_eq!(root.mark_type(), MarkType::Root);
        assert_eq!(root.text(), "1");
        assert_eq!(root.style().mark_color(MarkType::Root).unwrap().to_string(), "Red");

        let open = diagram.mark_at(MarkPosition::new(1, 0)).unwrap();
        assert_eq!(open.mark_type(), MarkType::Open);

        assert!(diagram.barre_at(BarrePosition::new(1, 1, 2)).is_some());
        assert!(
            diagram
                .fret_label_at(FretLabelPosition::new(FretLabelSide::Left, 3))
                .is_some()
        );
        assert_eq!(diagram.style().string_spacing().unwrap(), 32.0);
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let diagram = read(CHORD).unwrap();
        let written = write_diagram(&diagram);
        let reread = read(&written).unwrap();

        assert_eq!(written, write_diagram(&reread));
        assert_eq!(
            reread.style().store().get_string("custom.unknown").unwrap(),
            "kept as is"
        );
        assert!(written.contains(r#"type="Root""#));
        assert!(written.contains(r#"side="Left""#));
    }

    #[test]
    fn test_writer_shape() {
        let mut diagram = Diagram::new(&DiagramStyle::defaults(), 4, 4).unwrap();
        diagram
            .new_mark(MarkPosition::new(2, 1), MarkType::Normal, "")
            .unwrap();
        let written = write_diagram(&diagram);
        assert_eq!(
            written,
            "<diagram strings=\"4\" frets=\"4\">\n  <mark text=\"\" type=\"Normal\" string=\"2\" fret=\"1\"/>\n  <style/>\n</diagram>\n"
        );
    }

    #[test]
    fn test_typed_values_are_written_invariantly() {
        let diagram = Diagram::new(&DiagramStyle::defaults(), 6, 5).unwrap();
        diagram.style().set_title_text_size_mod_ratio(0.5).unwrap();
        diagram.style().set_fret_spacing(1234.5).unwrap();
        diagram
            .style()
            .set_title_label_style(TitleLabelStyle::ChordName)
            .unwrap();
        diagram.style().set_grid_color(NamedColor::Teal).unwrap();

        let written = write_diagram(&diagram);
        assert!(written.contains(r#"<setting key="title.textsizemodratio" value="0.5"/>"#));
        assert!(written.contains(r#"<setting key="grid.fretspacing" value="1234.5"/>"#));
        assert!(written.contains(r#"<setting key="title.labelstyle" value="ChordName"/>"#));
        assert!(written.contains(r#"<setting key="grid.color" value="Teal"/>"#));
    }

    #[test]
    fn test_title_is_escaped() {
        let mut diagram = Diagram::new(&DiagramStyle::defaults(), 6, 5).unwrap();
        diagram.set_title(Some(r#"A&B "<7>""#.to_string()));
        let written = write_diagram(&diagram);
        assert!(written.contains(r#"title="A&amp;B &quot;&lt;7&gt;&quot;""#));
        assert_eq!(read(&written).unwrap().title(), Some(r#"A&B "<7>""#));
    }

    #[test]
    fn test_missing_style_reads_as_empty() {
        let diagram = read(r#"<diagram strings="4" frets="3"/>"#).unwrap();
        assert!(diagram.style().store().is_empty());
        assert_eq!(diagram.title(), None);
    }

    #[test]
    fn test_not_xml() {
        assert!(matches!(
            read("<diagram strings="),
            Err(FretworkError::Xml { .. })
        ));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            read(r#"<chart strings="6" frets="5"/>"#),
            Err(FretworkError::MalformedXml(_))
        ));
        assert!(matches!(
            read(r#"<diagram frets="5"/>"#),
            Err(FretworkError::MalformedXml(_))
        ));
        assert!(matches!(
            read(r#"<diagram strings="six" frets="5"/>"#),
            Err(FretworkError::MalformedXml(_))
        ));
        assert!(matches!(
            read(r#"<diagram strings="6" frets="5"><mark string="1" fret="1" type="Ghost"/></diagram>"#),
            Err(FretworkError::MalformedXml(_))
        ));
        assert!(matches!(
            read(r#"<diagram strings="6" frets="5"><style><setting key="a"/></style></diagram>"#),
            Err(FretworkError::MalformedXml(_))
        ));
    }

    #[test]
    fn test_invalid_model_is_rejected() {
        assert!(matches!(
            read(r#"<diagram strings="1" frets="5"/>"#),
            Err(FretworkError::OutOfRange { .. })
        ));
        assert!(matches!(
            read(r#"<diagram strings="6" frets="5"><mark string="9" fret="1"/></diagram>"#),
            Err(FretworkError::ElementPositionOffFretboard(_))
        ));
        assert!(matches!(
            read(
                r#"<diagram strings="6" frets="5">
                    <barre fret="2" start="1" end="4"/>
                    <barre fret="2" start="3" end="6"/>
                </diagram>"#
            ),
            Err(FretworkError::ElementAlreadyExistsAtPosition(_))
        ));
    }

    #[test]
    fn test_out_of_range_settings_are_rejected() {
        let err = read(
            r#"<diagram strings="6" frets="5">
  <style>
    <setting key="grid.stringspacing" value="-50"/>
    <setting key="grid.fretspacing" value="0"/>
  </style>
</diagram>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FretworkError::Style(StyleError::OutOfRange { .. })
        ));

        let err = read(
            r#"<diagram strings="6" frets="5">
  <mark string="1" fret="1">
    <style><setting key="mark.radiusratio" value="2"/></style>
  </mark>
</diagram>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FretworkError::Style(StyleError::OutOfRange { .. })
        ));

        assert!(matches!(
            read(
                r#"<diagram strings="6" frets="5"><style><setting key="barre.stack" value="Sideways"/></style></diagram>"#
            ),
            Err(FretworkError::Style(StyleError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_malformed_message_has_location() {
        let err = read("<diagram strings=\"6\" frets=\"5\">\n  <fretlabel fret=\"1\"/>\n</diagram>")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("`side`"), "{message}");
        assert!(message.contains("line 2"), "{message}");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a\u{0007}b"), "ab");
        assert_eq!(escape_xml("x&y'"), "x&amp;y&apos;");
    }
}

//! Named groups of diagrams sharing a style level.
//!
//! A collection sits between the user level and its diagrams in the style
//! cascade, so a value set on the collection applies to every diagram in it
//! that does not override it.

use std::collections::BTreeSet;

use log::{debug, info};

use fretwork_core::style::DiagramStyle;

use crate::{diagram::Diagram, error::FretworkError};

/// An ordered set of diagrams with a shared style level.
#[derive(Debug)]
pub struct DiagramCollection {
    name: String,
    style: DiagramStyle,
    diagrams: Vec<Diagram>,
}

impl DiagramCollection {
    /// Create an empty collection whose style inherits from `parent`.
    pub fn new(name: impl Into<String>, parent: &DiagramStyle) -> Self {
        let name = name.into();
        debug!(name = name.as_str(); "Creating diagram collection");
        Self {
            name,
            style: DiagramStyle::new("collection", parent),
            diagrams: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the collection's style level.
    pub fn style(&self) -> &DiagramStyle {
        &self.style
    }

    pub fn diagrams(&self) -> &[Diagram] {
        &self.diagrams
    }

    pub fn diagram(&self, index: usize) -> Option<&Diagram> {
        self.diagrams.get(index)
    }

    pub fn diagram_mut(&mut self, index: usize) -> Option<&mut Diagram> {
        self.diagrams.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.diagrams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }

    /// Append a new empty diagram chained to this collection's style.
    pub fn new_diagram(
        &mut self,
        num_strings: u32,
        num_frets: u32,
    ) -> Result<&mut Diagram, FretworkError> {
        let diagram = Diagram::new(&self.style, num_strings, num_frets)?;
        let index = self.diagrams.len();
        self.diagrams.push(diagram);
        Ok(&mut self.diagrams[index])
    }

    /// Append a diagram built elsewhere, re-chaining its style to this
    /// collection.
    ///
    /// The diagram keeps its own style entries and elements. Whatever it
    /// inherited from its previous parent is not carried over.
    pub fn add_diagram(&mut self, diagram: &Diagram) -> &mut Diagram {
        let adopted = diagram.rechained(&self.style);
        let index = self.diagrams.len();
        self.diagrams.push(adopted);
        &mut self.diagrams[index]
    }

    /// Insert a deep copy of the diagram at `index` right after it.
    ///
    /// # Errors
    ///
    /// Returns [`FretworkError::OutOfRange`] if `index` is not a valid index.
    pub fn duplicate_diagram(&mut self, index: usize) -> Result<&mut Diagram, FretworkError> {
        let copy = self
            .diagrams
            .get(index)
            .ok_or_else(|| index_out_of_range(index, self.diagrams.len()))?
            .clone();
        info!(index; "Duplicating diagram");
        self.diagrams.insert(index + 1, copy);
        Ok(&mut self.diagrams[index + 1])
    }

    /// Remove and return the diagram at `index`.
    pub fn remove_diagram(&mut self, index: usize) -> Result<Diagram, FretworkError> {
        if index >= self.diagrams.len() {
            return Err(index_out_of_range(index, self.diagrams.len()));
        }
        Ok(self.diagrams.remove(index))
    }

    /// Union of the colors used by all diagrams, sorted.
    pub fn colors_in_use(&self) -> Result<BTreeSet<String>, FretworkError> {
        let mut colors = BTreeSet::new();
        for diagram in &self.diagrams {
            colors.extend(diagram.colors_in_use()?);
        }
        Ok(colors)
    }
}

fn index_out_of_range(index: usize, len: usize) -> FretworkError {
    FretworkError::OutOfRange {
        what: "diagram index",
        value: i64::try_from(index).unwrap_or(i64::MAX),
        expected: if len == 0 {
            "an index into a non-empty collection"
        } else {
            "an index below the collection length"
        },
    }
}

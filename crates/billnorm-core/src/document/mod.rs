//! Document object model for billing statements and templates.
//!
//! A document is an ordered body of paragraphs and tables. The core reads
//! uploaded statements through this model and mutates templates in place;
//! the container format itself is handled by a [`DocumentCodec`].

mod codec;

pub use codec::{DocumentCodec, JsonCodec};

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// A complete document: top-level body blocks in reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Body blocks.
    #[serde(default)]
    pub body: Vec<Block>,
}

/// A top-level body block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// A paragraph made of text runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Paragraph style name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Text runs.
    #[serde(default)]
    pub runs: Vec<Run>,
}

/// A run of text sharing one character format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,

    #[serde(default, skip_serializing_if = "RunFormat::is_plain")]
    pub format: RunFormat,
}

/// Character formatting carried by runs and cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunFormat {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,

    /// Font size in points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,

    /// Font family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

impl RunFormat {
    /// Check if no formatting is applied.
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// A table of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table style name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(default)]
    pub rows: Vec<Row>,
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub cells: Vec<Cell>,
}

/// A table cell with settable text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub text: String,

    #[serde(default, skip_serializing_if = "RunFormat::is_plain")]
    pub format: RunFormat,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level paragraphs in order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    /// Mutable top-level paragraphs in order.
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.body.iter_mut().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    /// Top-level tables in order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    /// Mutable top-level tables in order.
    pub fn tables_mut(&mut self) -> impl Iterator<Item = &mut Table> {
        self.body.iter_mut().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }

    /// Get the paragraph with the given ordinal.
    pub fn paragraph_mut(&mut self, index: usize) -> Option<&mut Paragraph> {
        self.paragraphs_mut().nth(index)
    }

    /// Get the table with the given ordinal.
    pub fn table_mut(&mut self, index: usize) -> Option<&mut Table> {
        self.tables_mut().nth(index)
    }

    /// Append a paragraph holding `text` as the last body block.
    pub fn add_paragraph(&mut self, text: impl Into<String>) {
        self.body.push(Block::Paragraph(Paragraph::new(text)));
    }

    /// Insert `paragraph` as the sibling directly after the paragraph with
    /// ordinal `index`. Returns false when no such paragraph exists.
    pub fn insert_paragraph_after(&mut self, index: usize, paragraph: Paragraph) -> bool {
        let position = self
            .body
            .iter()
            .enumerate()
            .filter(|(_, b)| matches!(b, Block::Paragraph(_)))
            .nth(index)
            .map(|(pos, _)| pos);

        match position {
            Some(pos) => {
                self.body.insert(pos + 1, Block::Paragraph(paragraph));
                true
            }
            None => false,
        }
    }
}

impl Paragraph {
    /// Create a paragraph with a single plain run.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            style: None,
            runs: vec![Run::new(text)],
        }
    }

    /// Full paragraph text (runs concatenated).
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Append a plain run.
    pub fn add_run(&mut self, text: impl Into<String>) {
        self.runs.push(Run::new(text));
    }
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: RunFormat::default(),
        }
    }
}

impl Table {
    /// Create a table from rows of cell texts.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            style: None,
            rows: rows.into_iter().map(Row::from_texts).collect(),
        }
    }

    /// Header row (first row).
    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Data rows (all rows except header).
    pub fn data_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().skip(1)
    }
}

impl Row {
    /// Create a row from cell texts.
    pub fn from_texts<I>(texts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            cells: texts.into_iter().map(Cell::new).collect(),
        }
    }

    /// Text of the first cell, empty when the row has no cells.
    pub fn first_text(&self) -> &str {
        self.cells.first().map(|c| c.text.as_str()).unwrap_or("")
    }

    /// Trimmed text of every cell.
    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.text.trim()).collect()
    }
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: RunFormat::default(),
        }
    }

    /// Replace the cell text, keeping its format.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Document {
        Document {
            body: vec![
                Block::Paragraph(Paragraph::new("Header")),
                Block::Table(Table::from_rows([["A", "B"]])),
                Block::Paragraph(Paragraph::new("Footer")),
            ],
        }
    }

    #[test]
    fn test_paragraphs_skip_tables() {
        let doc = sample();
        let texts: Vec<String> = doc.paragraphs().map(|p| p.text()).collect();
        assert_eq!(texts, vec!["Header", "Footer"]);
        assert_eq!(doc.tables().count(), 1);
    }

    #[test]
    fn test_insert_paragraph_after_uses_paragraph_ordinal() {
        let mut doc = sample();
        assert!(doc.insert_paragraph_after(0, Paragraph::new("Inserted")));

        // Inserted directly after "Header", before the table.
        assert!(matches!(&doc.body[1], Block::Paragraph(p) if p.text() == "Inserted"));
        assert!(matches!(&doc.body[2], Block::Table(_)));
        assert!(!doc.insert_paragraph_after(5, Paragraph::new("nowhere")));
    }

    #[test]
    fn test_paragraph_text_joins_runs() {
        let mut p = Paragraph::new("TOTAL");
        p.add_run("\n1,000.00");
        assert_eq!(p.text(), "TOTAL\n1,000.00");
    }

    #[test]
    fn test_set_text_keeps_format() {
        let mut cell = Cell::new("old");
        cell.format.bold = true;
        cell.set_text("new");
        assert_eq!(cell.text, "new");
        assert!(cell.format.bold);
    }

    #[test]
    fn test_first_text_of_empty_row() {
        assert_eq!(Row::default().first_text(), "");
    }
}

//! Anchor-driven template patching.
//!
//! Computed values are written next to anchor text found in the template. A
//! [`PatchRule`] pairs an [`Anchor`] predicate with the mutations to perform
//! on matching nodes; rules are applied in order over a flattened view of the
//! document, and every rule reports whether it wrote anything.

use serde::Serialize;
use tracing::{debug, warn};

use crate::document::{Block, Document, Paragraph, Row};

/// Reference to a node in the flattened document view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    /// Top-level paragraph by ordinal.
    Paragraph(usize),
    /// Row of a top-level table.
    Row { table: usize, row: usize },
}

/// Flatten a document into paragraphs and table rows, in document order.
pub fn flatten(document: &Document) -> Vec<NodeRef> {
    let mut nodes = Vec::new();
    let mut paragraph = 0;
    let mut table = 0;

    for block in &document.body {
        match block {
            Block::Paragraph(_) => {
                nodes.push(NodeRef::Paragraph(paragraph));
                paragraph += 1;
            }
            Block::Table(t) => {
                nodes.extend((0..t.rows.len()).map(|row| NodeRef::Row { table, row }));
                table += 1;
            }
        }
    }

    nodes
}

/// Substring test against node text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatch {
    needles: Vec<String>,
    case_insensitive: bool,
}

impl TextMatch {
    /// Case-sensitive match of any needle.
    pub fn any<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            needles: needles.into_iter().map(Into::into).collect(),
            case_insensitive: false,
        }
    }

    /// Case-sensitive match of one needle.
    pub fn exact(needle: impl Into<String>) -> Self {
        Self::any([needle.into()])
    }

    /// Case-insensitive match of one needle.
    pub fn ignore_case(needle: impl Into<String>) -> Self {
        Self {
            needles: vec![needle.into().to_uppercase()],
            case_insensitive: true,
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        if self.case_insensitive {
            let upper = text.to_uppercase();
            self.needles.iter().any(|n| upper.contains(n.as_str()))
        } else {
            self.needles.iter().any(|n| text.contains(n.as_str()))
        }
    }
}

/// Predicate selecting anchor nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    /// Paragraph whose text matches.
    Paragraph(TextMatch),
    /// Table row whose first cell matches.
    FirstCell(TextMatch),
    /// Table row with any matching cell.
    AnyCell(TextMatch),
}

impl Anchor {
    fn matches(&self, document: &Document, node: NodeRef) -> bool {
        match (self, node) {
            (Anchor::Paragraph(m), NodeRef::Paragraph(index)) => document
                .paragraphs()
                .nth(index)
                .is_some_and(|p| m.matches(&p.text())),
            (Anchor::FirstCell(m), NodeRef::Row { table, row }) => {
                row_at(document, table, row).is_some_and(|r| {
                    !r.cells.is_empty() && m.matches(r.first_text())
                })
            }
            (Anchor::AnyCell(m), NodeRef::Row { table, row }) => row_at(document, table, row)
                .is_some_and(|r| r.cells.iter().any(|c| m.matches(&c.text))),
            _ => false,
        }
    }
}

fn row_at(document: &Document, table: usize, row: usize) -> Option<&Row> {
    document.tables().nth(table).and_then(|t| t.rows.get(row))
}

/// Which cell of a row to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellPos {
    Index(usize),
    Last,
}

/// Change applied to an anchor node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Append a run starting with a line break to a paragraph.
    AppendLine(String),
    /// Overwrite a cell's text in a row.
    SetCell { cell: CellPos, text: String },
}

impl Mutation {
    pub fn set_cell(index: usize, text: impl Into<String>) -> Self {
        Mutation::SetCell {
            cell: CellPos::Index(index),
            text: text.into(),
        }
    }

    pub fn set_last_cell(text: impl Into<String>) -> Self {
        Mutation::SetCell {
            cell: CellPos::Last,
            text: text.into(),
        }
    }

    /// Apply to a node. Returns whether the node was changed.
    fn apply(&self, document: &mut Document, node: NodeRef) -> bool {
        match (self, node) {
            (Mutation::AppendLine(text), NodeRef::Paragraph(index)) => {
                match document.paragraph_mut(index) {
                    Some(paragraph) => {
                        append_line(paragraph, text);
                        true
                    }
                    None => false,
                }
            }
            (Mutation::SetCell { cell, text }, NodeRef::Row { table, row }) => {
                let Some(row) = document.table_mut(table).and_then(|t| t.rows.get_mut(row)) else {
                    return false;
                };
                let index = match cell {
                    CellPos::Index(i) => *i,
                    CellPos::Last => match row.cells.len().checked_sub(1) {
                        Some(i) => i,
                        None => return false,
                    },
                };
                match row.cells.get_mut(index) {
                    Some(c) => {
                        c.set_text(text.clone());
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }
}

fn append_line(paragraph: &mut Paragraph, text: &str) {
    paragraph.add_run(format!("\n{}", text));
}

/// How many anchor nodes a rule writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only the first matching node in document order.
    First,
    /// Every matching node.
    Every,
}

/// Document-level action taken when no anchor matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    AppendParagraph(String),
}

/// A named (anchor, mutations) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRule {
    pub name: String,
    pub anchor: Anchor,
    pub scope: Scope,
    pub mutations: Vec<Mutation>,
    pub fallback: Option<Fallback>,
}

impl PatchRule {
    pub fn new(name: impl Into<String>, anchor: Anchor, scope: Scope) -> Self {
        Self {
            name: name.into(),
            anchor,
            scope,
            mutations: Vec::new(),
            fallback: None,
        }
    }

    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutations.push(mutation);
        self
    }

    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Apply this rule to a document.
    pub fn apply(&self, document: &mut Document) -> PatchStatus {
        let mut hits = 0;

        for node in flatten(document) {
            if !self.anchor.matches(document, node) {
                continue;
            }

            let mut changed = false;
            for mutation in &self.mutations {
                changed |= mutation.apply(document, node);
            }
            if changed {
                hits += 1;
            }
            debug!("Rule {} matched {:?} (changed: {})", self.name, node, changed);

            if self.scope == Scope::First {
                break;
            }
        }

        if hits > 0 {
            return PatchStatus::Written { hits };
        }

        match &self.fallback {
            Some(Fallback::AppendParagraph(text)) => {
                debug!("Rule {} fell back to appending a paragraph", self.name);
                document.add_paragraph(text.clone());
                PatchStatus::FellBack
            }
            None => {
                warn!("Anchor for {} not found, value not written", self.name);
                PatchStatus::Missed
            }
        }
    }
}

/// Outcome of one patch rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PatchStatus {
    /// Anchor found; this many nodes were changed.
    Written { hits: usize },
    /// Anchor not found; the fallback was applied.
    FellBack,
    /// Anchor not found; nothing was written.
    Missed,
}

/// Per-rule outcome of a patch plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    pub entries: Vec<PatchEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchEntry {
    pub rule: String,
    #[serde(flatten)]
    pub status: PatchStatus,
}

impl PatchReport {
    /// Names of rules whose values were not written anywhere.
    pub fn missed(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.status == PatchStatus::Missed)
            .map(|e| e.rule.as_str())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missed().is_empty()
    }

    pub fn status(&self, rule: &str) -> Option<PatchStatus> {
        self.entries.iter().find(|e| e.rule == rule).map(|e| e.status)
    }
}

/// Apply rules in order.
pub fn apply_plan(document: &mut Document, plan: &[PatchRule]) -> PatchReport {
    let entries = plan
        .iter()
        .map(|rule| PatchEntry {
            rule: rule.name.clone(),
            status: rule.apply(document),
        })
        .collect();

    PatchReport { entries }
}

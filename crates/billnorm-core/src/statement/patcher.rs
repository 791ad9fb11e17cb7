//! Shared template mutations.

use serde::Serialize;
use tracing::debug;

use crate::document::{Document, Paragraph};

/// Default contact line written into statements.
pub const DEFAULT_CONTACT_LINE: &str = "Contact No.: 8941-8518";

/// What [`ensure_contact_number`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ContactPatch {
    /// A contact line already existed.
    AlreadyPresent,
    /// Inserted after the accreditation paragraph with this ordinal.
    InsertedAfter { paragraph: usize },
    /// No accreditation paragraph; appended at the end.
    Appended,
}

/// Make sure the document carries a contact-number line, without duplicating it.
///
/// The line goes directly below the first "Accreditation No." paragraph, or
/// at the end of the document when there is none.
pub fn ensure_contact_number(document: &mut Document, contact_line: &str) -> ContactPatch {
    if document
        .paragraphs()
        .any(|p| p.text().to_lowercase().contains("contact no"))
    {
        debug!("Contact line already present");
        return ContactPatch::AlreadyPresent;
    }

    let anchor = document
        .paragraphs()
        .position(|p| p.text().to_lowercase().contains("accreditation no"));

    if let Some(index) = anchor {
        if document.insert_paragraph_after(index, Paragraph::new(contact_line)) {
            debug!("Inserted contact line after paragraph {}", index);
            return ContactPatch::InsertedAfter { paragraph: index };
        }
    }

    document.add_paragraph(contact_line);
    debug!("Appended contact line at end of document");
    ContactPatch::Appended
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, RunFormat, Table};
    use pretty_assertions::assert_eq;

    fn texts(doc: &Document) -> Vec<String> {
        doc.paragraphs().map(|p| p.text()).collect()
    }

    #[test]
    fn test_inserts_after_accreditation() {
        let mut doc = Document {
            body: vec![
                Block::Paragraph(Paragraph::new("City Hospital")),
                Block::Paragraph(Paragraph::new("Accreditation No.: 12345")),
                Block::Table(Table::from_rows([["a", "b"]])),
                Block::Paragraph(Paragraph::new("Footer")),
            ],
        };

        let result = ensure_contact_number(&mut doc, DEFAULT_CONTACT_LINE);
        assert_eq!(result, ContactPatch::InsertedAfter { paragraph: 1 });
        assert_eq!(
            texts(&doc),
            vec!["City Hospital", "Accreditation No.: 12345", "Contact No.: 8941-8518", "Footer"]
        );
        // Structural insertion: directly after the anchor, before the table
        assert!(matches!(&doc.body[2], Block::Paragraph(p) if p.text() == DEFAULT_CONTACT_LINE));
    }

    #[test]
    fn test_second_run_is_noop() {
        let mut doc = Document::new();
        doc.add_paragraph("ACCREDITATION NO. 555");

        ensure_contact_number(&mut doc, DEFAULT_CONTACT_LINE);
        let once = doc.clone();
        let result = ensure_contact_number(&mut doc, DEFAULT_CONTACT_LINE);

        assert_eq!(result, ContactPatch::AlreadyPresent);
        assert_eq!(doc, once);
    }

    #[test]
    fn test_existing_contact_any_case() {
        let mut doc = Document::new();
        doc.add_paragraph("CONTACT NO: 123");
        let before = doc.clone();

        assert_eq!(ensure_contact_number(&mut doc, DEFAULT_CONTACT_LINE), ContactPatch::AlreadyPresent);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_appends_without_anchor() {
        let mut doc = Document::new();
        doc.add_paragraph("Header");

        assert_eq!(ensure_contact_number(&mut doc, DEFAULT_CONTACT_LINE), ContactPatch::Appended);
        assert_eq!(texts(&doc), vec!["Header", "Contact No.: 8941-8518"]);
    }

    #[test]
    fn test_preserves_formatting_of_other_paragraphs() {
        let mut styled = Paragraph::new("Accreditation No.: 1");
        styled.style = Some("Heading 2".to_string());
        styled.runs[0].format = RunFormat {
            bold: true,
            ..RunFormat::default()
        };
        let mut doc = Document {
            body: vec![Block::Paragraph(styled.clone())],
        };

        ensure_contact_number(&mut doc, DEFAULT_CONTACT_LINE);
        assert_eq!(doc.paragraphs().next(), Some(&styled));
    }
}

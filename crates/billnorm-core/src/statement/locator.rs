//! Locating the itemized charges table in an uploaded statement.

use tracing::debug;

use super::rules::patterns::DETAILED_HEADER;
use crate::document::{Document, Table};

/// Find the detailed charges table.
///
/// Returns the first table whose header row mentions PARTICULARS or UNIT
/// PRICE, falling back to the first table of the document.
pub fn find_detailed_table(document: &Document) -> Option<&Table> {
    for (index, table) in document.tables().enumerate() {
        if let Some(header) = table.header() {
            let header_text = header.texts().join(" ");
            if DETAILED_HEADER.is_match(&header_text) {
                debug!("Detailed table found at index {}", index);
                return Some(table);
            }
        }
    }

    let fallback = document.tables().next();
    if fallback.is_some() {
        debug!("No detailed table header found, falling back to first table");
    }
    fallback
}

//! Document serialization.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::{Document, Result};
use crate::error::DocumentError;

/// Trait for document container formats.
pub trait DocumentCodec {
    /// Decode a document from bytes.
    fn decode(&self, data: &[u8]) -> Result<Document>;

    /// Encode a document to bytes.
    fn encode(&self, document: &Document) -> Result<Vec<u8>>;

    /// Load a document from a file.
    fn load(&self, path: &Path) -> crate::Result<Document> {
        let data = fs::read(path)?;
        debug!("Loaded {} bytes from {}", data.len(), path.display());
        Ok(self.decode(&data)?)
    }

    /// Save a document to a file.
    fn save(&self, document: &Document, path: &Path) -> crate::Result<()> {
        let data = self.encode(document)?;
        fs::write(path, data)?;
        Ok(())
    }
}

/// JSON serialization of the document model.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit indented JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl DocumentCodec for JsonCodec {
    fn decode(&self, data: &[u8]) -> Result<Document> {
        serde_json::from_slice(data).map_err(|e| DocumentError::Decode(e.to_string()))
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(document)
        } else {
            serde_json::to_vec(document)
        };
        encoded.map_err(|e| DocumentError::Encode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Block, Paragraph, Table};

    #[test]
    fn test_decode_tagged_blocks() {
        let json = br#"{
            "body": [
                {"type": "paragraph", "runs": [{"text": "TOTAL AMOUNT DUE", "format": {"bold": true}}]},
                {"type": "table", "rows": [{"cells": [{"text": "PARTICULARS"}]}]}
            ]
        }"#;

        let doc = JsonCodec::new().decode(json).unwrap();
        assert_eq!(doc.body.len(), 2);
        let para = doc.paragraphs().next().unwrap();
        assert!(para.runs[0].format.bold);
        assert_eq!(doc.tables().next().unwrap().rows[0].first_text(), "PARTICULARS");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = JsonCodec::new().decode(b"PK\x03\x04").unwrap_err();
        assert!(matches!(err, DocumentError::Decode(_)));
    }

    #[test]
    fn test_encode_keeps_structure() {
        let doc = Document {
            body: vec![
                Block::Paragraph(Paragraph::new("Statement")),
                Block::Table(Table::from_rows([["Room", "1,000.00"]])),
            ],
        };
        let codec = JsonCodec::new().with_pretty(true);
        let bytes = codec.encode(&doc).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), doc);
    }
}

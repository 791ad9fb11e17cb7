//! Core library for hospital statement normalization.
//!
//! This crate provides:
//! - A document model for statements and reference templates
//! - Detailed charges table location and line-item extraction
//! - Label normalization and non-drug classification rules
//! - Category totals (regular, non-drug, senior) in exact decimal arithmetic
//! - Anchor-driven template patching with a report of missed targets

pub mod document;
pub mod error;
pub mod models;
pub mod service;
pub mod statement;

pub use document::{Document, DocumentCodec, JsonCodec};
pub use error::{BillnormError, Result};
pub use models::config::BillnormConfig;
pub use models::statement::{Category, CategoryTotals, LineItem};
pub use service::{StatementService, Upload};
pub use statement::{processor_for, ProcessOutcome, ProcessorOptions, StatementProcessor};

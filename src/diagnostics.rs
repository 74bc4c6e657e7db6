//! Diagnostics
//!
//! Collects data-integrity issues found while building the model. Nothing
//! here aborts construction: every item is logged when recorded and kept so
//! callers can report on the quality of the export afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Diagnostic Codes
// =============================================================================

/// Diagnostic code for categorizing issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// slot_usage or slots entry names a slot that does not exist
    UnknownSlotReference,
    /// Class declares a parent that does not exist; treated as root
    UnknownParentClass,
    /// Declared parent chain loops back; class treated as root
    InheritanceCycle,
    /// Range is neither primitive nor a known entity
    UnresolvedRange,
    /// Variable maps to a class that does not exist
    UnknownVariableClass,
    /// Variable label already taken
    DuplicateVariable,
    /// Same name registered under two entity types
    NameCollision,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownSlotReference => "W001",
            Self::UnknownParentClass => "W002",
            Self::InheritanceCycle => "W003",
            Self::UnresolvedRange => "W004",
            Self::UnknownVariableClass => "W005",
            Self::DuplicateVariable => "W006",
            Self::NameCollision => "W007",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::UnknownSlotReference
            | Self::UnknownParentClass
            | Self::InheritanceCycle
            | Self::UnresolvedRange
            | Self::UnknownVariableClass
            | Self::DuplicateVariable => Severity::Warning,
            Self::NameCollision => Severity::Info,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

// =============================================================================
// Diagnostic Item
// =============================================================================

/// A single diagnostic item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticItem {
    /// Entity the issue was found on
    pub entity: String,
    pub code: DiagnosticCode,
    pub message: String,
}

impl fmt::Display for DiagnosticItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.code.severity(),
            self.code,
            self.entity,
            self.message
        )
    }
}

// =============================================================================
// Diagnostics Collection
// =============================================================================

/// Diagnostics gathered during model construction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<DiagnosticItem>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record and log an issue
    pub fn record(&mut self, code: DiagnosticCode, entity: impl Into<String>, message: impl Into<String>) {
        let item = DiagnosticItem {
            entity: entity.into(),
            code,
            message: message.into(),
        };
        match code.severity() {
            Severity::Warning => tracing::warn!(code = %item.code, entity = %item.entity, "{}", item.message),
            Severity::Info => tracing::info!(code = %item.code, entity = %item.entity, "{}", item.message),
        }
        self.items.push(item);
    }

    pub fn items(&self) -> &[DiagnosticItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(move |d| d.code == code)
    }

    pub fn has(&self, code: DiagnosticCode, entity: &str) -> bool {
        self.with_code(code).any(|d| d.entity == entity)
    }

    /// Count per code, sorted by code
    pub fn summary(&self) -> Vec<(DiagnosticCode, usize)> {
        let mut counts: Vec<(DiagnosticCode, usize)> = Vec::new();
        for item in &self.items {
            match counts.iter_mut().find(|(c, _)| *c == item.code) {
                Some((_, n)) => *n += 1,
                None => counts.push((item.code, 1)),
            }
        }
        counts.sort_by_key(|(c, _)| c.as_str());
        counts
    }
}

//! Per-call projection anomalies.

use std::fmt;

use crate::schema::ElementKind;

/// What went wrong with one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The record carried no usable user key; the row is indexed under its
    /// input position and `BatchView::get` will not find it.
    MalformedKey,
    /// Strict mode: a schema field had no bin. The field is zero-filled.
    MissingField {
        /// The absent field.
        field: String,
    },
    /// Strict mode: a bin had no schema field. The bin is ignored.
    IgnoredBin {
        /// The unexpected bin.
        bin: String,
    },
    /// A binary payload did not match the declared width.
    BinaryWidthMismatch {
        /// Target field.
        field: String,
        /// Field size in bytes.
        expected: usize,
        /// Payload size in bytes.
        actual: usize,
    },
    /// A list payload did not match the declared vector length.
    VectorLengthMismatch {
        /// Target field.
        field: String,
        /// Declared vector length.
        expected: usize,
        /// Elements in the list.
        actual: usize,
    },
    /// The bin value can not be stored in the field's kind.
    TypeMismatch {
        /// Target field.
        field: String,
        /// Kind of the field, or of one vector element.
        expected: ElementKind,
        /// Type name of the offending value.
        actual: &'static str,
    },
}

/// One anomaly, tied to the input position of the record it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Input position of the record.
    pub index: usize,
    /// What went wrong.
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record at index {}: ", self.index)?;
        match &self.kind {
            DiagnosticKind::MalformedKey => f.write_str(
                "missing or malformed key, indexed by position; get() will not find this record",
            ),
            DiagnosticKind::MissingField { field } => {
                write!(f, "field '{field}' not found in bins (zero-filled)")
            }
            DiagnosticKind::IgnoredBin { bin } => write!(f, "bin '{bin}' not in schema (ignored)"),
            DiagnosticKind::BinaryWidthMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "field '{field}' expects {expected} bytes, got {actual}"
            ),
            DiagnosticKind::VectorLengthMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "field '{field}' expects {expected} elements, got {actual} (zero-filled)"
            ),
            DiagnosticKind::TypeMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "can not write {actual} into {expected} field '{field}' (zero-filled)"
            ),
        }
    }
}

/// Anomalies collected while projecting a single batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(crate) fn push(&mut self, index: usize, kind: DiagnosticKind) {
        self.entries.push(Diagnostic { index, kind });
    }

    /// Number of diagnostics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch projected cleanly.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Diagnostics in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    /// Diagnostics as a slice, in input order.
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Diagnostics raised by the record at input position `index`.
    pub fn for_record(&self, index: usize) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.entries.iter().filter(move |d| d.index == index)
    }

    /// Input positions whose key fell back to a positional index.
    pub fn malformed_keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries
            .iter()
            .filter(|d| d.kind == DiagnosticKind::MalformedKey)
            .map(|d| d.index)
    }

    /// Takes the diagnostics out.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{DiagnosticKind, Diagnostics};
    use crate::schema::ElementKind;

    #[test]
    fn collect_and_query() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.push(0, DiagnosticKind::MalformedKey);
        diagnostics.push(
            2,
            DiagnosticKind::MissingField {
                field: "b".into(),
            },
        );
        diagnostics.push(2, DiagnosticKind::MalformedKey);

        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics.malformed_keys().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(diagnostics.for_record(2).count(), 2);
        assert_eq!(diagnostics.for_record(1).count(), 0);
    }

    #[test]
    fn display() {
        let mut diagnostics = Diagnostics::default();
        diagnostics.push(
            4,
            DiagnosticKind::TypeMismatch {
                field: "id".into(),
                expected: ElementKind::Int32,
                actual: "string",
            },
        );
        assert_eq!(
            diagnostics.as_slice()[0].to_string(),
            "record at index 4: can not write string into i4 field 'id' (zero-filled)"
        );
    }
}

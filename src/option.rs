/// What to do with a binary payload whose length differs from the
/// declared fixed width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BinaryWidthPolicy {
    /// Leave the field zero-filled.
    #[default]
    Exact,
    /// Copy what fits and zero-pad the rest, like fixed-length byte strings
    /// in array libraries.
    PadOrTruncate,
}

/// Options of a single projection.
///
/// Either policy reports a width mismatch as a diagnostic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectOption {
    pub(crate) strict: bool,
    pub(crate) binary_width: BinaryWidthPolicy,
}

impl ProjectOption {
    /// Report schema fields missing from a record's bins and bins missing
    /// from the schema.
    pub fn strict(self, strict: bool) -> Self {
        ProjectOption { strict, ..self }
    }

    /// How to handle binary payloads of the wrong length.
    pub fn binary_width(self, binary_width: BinaryWidthPolicy) -> Self {
        ProjectOption {
            binary_width,
            ..self
        }
    }

    /// Whether strict mode is on.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// The binary width policy in effect.
    pub fn binary_width_policy(&self) -> BinaryWidthPolicy {
        self.binary_width
    }
}

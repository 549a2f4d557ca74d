use std::fmt::{self, Display};

use crate::{ArgumentValue, QueryBuildError};

/// One selected field and its nested selection set.
///
/// Fields are immutable once handed to [`select`](Field::select) or an
/// [`Operation`](crate::Operation); children are always moved in by
/// value, so a tree is acyclic by construction.
#[derive(Debug, PartialEq, Clone)]
pub struct Field {
    name: String,
    alias: Option<String>,
    args: Vec<(String, ArgumentValue)>,
    selection: Vec<Field>,
}

impl Field {
    /// Create a new leaf field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            args: Vec::new(),
            selection: Vec::new(),
        }
    }

    /// Set the field's alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Append an argument. Argument order is preserved in the output.
    #[must_use]
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<ArgumentValue>) -> Self {
        self.args.push((name.into(), value.into()));
        self
    }

    /// Replace the selection set with `children`, in the given order.
    ///
    /// Fails if two children resolve to the same output key (alias if
    /// present, else name) at this level.
    pub fn select(mut self, children: Vec<Field>) -> Result<Self, QueryBuildError> {
        ensure_distinct_keys(&children)?;
        self.selection = children;
        Ok(self)
    }

    /// The key this field occupies in the response object.
    pub fn output_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn args(&self) -> &[(String, ArgumentValue)] {
        &self.args
    }

    pub(crate) fn selection(&self) -> &[Field] {
        &self.selection
    }
}

/// Checks the output-key invariant for one nesting level.
pub(crate) fn ensure_distinct_keys(fields: &[Field]) -> Result<(), QueryBuildError> {
    for (i, field) in fields.iter().enumerate() {
        let key = field.output_key();
        if fields[..i].iter().any(|other| other.output_key() == key) {
            return Err(QueryBuildError::DuplicateOutputKey {
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

impl Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(alias) = &self.alias {
            write!(f, "{}: ", alias)?;
        }

        write!(f, "{}", self.name)?;

        if !self.args.is_empty() {
            for (i, (name, value)) in self.args.iter().enumerate() {
                match i {
                    0 => write!(f, "({}: {}", name, value)?,
                    _ => write!(f, ", {}: {}", name, value)?,
                }
            }
            write!(f, ")")?;
        }

        if !self.selection.is_empty() {
            write!(f, " {{")?;
            for child in &self.selection {
                write!(f, " {}", child)?;
            }
            write!(f, " }}")?;
        }

        Ok(())
    }
}

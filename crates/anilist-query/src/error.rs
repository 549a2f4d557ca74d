use thiserror::Error;

/// Errors raised while assembling a query, before any network activity.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryBuildError {
    /// Two fields at the same nesting level resolve to the same output key.
    #[error("duplicate output key `{key}` in selection set")]
    DuplicateOutputKey {
        /// The conflicting output key (alias if present, else field name).
        key: String,
    },
    /// A field was created with an empty name.
    #[error("field names must be non-empty")]
    EmptyFieldName,
    /// An argument was attached with an empty name.
    #[error("argument names must be non-empty")]
    EmptyArgumentName,
    /// A variable reference was created with an empty name.
    #[error("variable names must be non-empty")]
    EmptyVariableName,
    /// A float argument was `NaN` or infinite, which have no GraphQL
    /// literal form.
    #[error("float arguments must be finite, got `{value}`")]
    NonFiniteFloat {
        /// The offending value.
        value: f64,
    },
    /// The same variable name was declared with two different GraphQL types.
    #[error("variable `${name}` declared as both `{first}` and `{second}`")]
    VariableTypeConflict {
        /// The variable name.
        name: String,
        /// The type from the first declaration encountered.
        first: String,
        /// The conflicting type.
        second: String,
    },
}

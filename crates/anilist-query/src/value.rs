use std::fmt::{self, Display};

/// A variable reference used as an argument value.
///
/// Serializes as `$name` at its use site and registers `name` in the
/// outgoing variables map with the given runtime value. The declared
/// GraphQL type (e.g. `Int`, `[MediaListStatus]`) ends up in the
/// operation's variable declaration list.
#[derive(Debug, PartialEq, Clone)]
pub struct Variable {
    name: String,
    graphql_type: String,
    value: serde_json::Value,
}

impl Variable {
    /// Create a new variable reference.
    pub fn new(
        name: impl Into<String>,
        graphql_type: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            name: name.into(),
            graphql_type: graphql_type.into(),
            value: value.into(),
        }
    }

    /// The variable name, without the leading `$`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared GraphQL type.
    pub fn graphql_type(&self) -> &str {
        &self.graphql_type
    }

    /// The runtime value sent in the variables map.
    pub const fn value(&self) -> &serde_json::Value {
        &self.value
    }
}

/// An argument value attached to a [`Field`](crate::Field).
#[derive(Debug, PartialEq, Clone)]
pub enum ArgumentValue {
    /// A quoted, escaped string literal.
    String(String),
    /// An integer literal.
    Int(i64),
    /// A float literal.
    Float(f64),
    /// A boolean literal.
    Boolean(bool),
    /// An enum identifier, emitted bare (no quotes).
    Enum(String),
    /// A list of values, emitted as `[v1, v2, ...]`.
    List(Vec<ArgumentValue>),
    /// An input object, emitted as `{k1: v1, k2: v2}`. Used for
    /// compound filters; key order is preserved.
    Object(Vec<(String, ArgumentValue)>),
    /// The `null` literal.
    Null,
    /// A variable reference, emitted as `$name`.
    Variable(Variable),
}

impl ArgumentValue {
    /// Shorthand for an enum identifier value.
    pub fn enum_value(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }
}

impl Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentValue::String(s) => {
                write!(f, "\"")?;
                write_escaped(f, s)?;
                write!(f, "\"")
            }
            ArgumentValue::Int(i) => write!(f, "{}", i),
            // Debug formatting always keeps a decimal point or exponent,
            // so a float literal is never mistaken for an int literal.
            ArgumentValue::Float(x) => write!(f, "{:?}", x),
            ArgumentValue::Boolean(b) => write!(f, "{}", b),
            ArgumentValue::Enum(name) => write!(f, "{}", name),
            ArgumentValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    match i {
                        0 => write!(f, "{}", item)?,
                        _ => write!(f, ", {}", item)?,
                    }
                }
                write!(f, "]")
            }
            ArgumentValue::Object(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    match i {
                        0 => write!(f, "{}: {}", key, value)?,
                        _ => write!(f, ", {}: {}", key, value)?,
                    }
                }
                write!(f, "}}")
            }
            ArgumentValue::Null => write!(f, "null"),
            ArgumentValue::Variable(var) => write!(f, "${}", var.name()),
        }
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    for c in s.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\r' => write!(f, "\\r")?,
            '\t' => write!(f, "\\t")?,
            _ => write!(f, "{}", c)?,
        }
    }
    Ok(())
}

impl From<&str> for ArgumentValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ArgumentValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i32> for ArgumentValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for ArgumentValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for ArgumentValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for ArgumentValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Variable> for ArgumentValue {
    fn from(var: Variable) -> Self {
        Self::Variable(var)
    }
}

impl<V: Into<ArgumentValue>> From<Vec<V>> for ArgumentValue {
    fn from(items: Vec<V>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

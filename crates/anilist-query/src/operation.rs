use std::fmt::{self, Display, Write};

use serde::Serialize;

use crate::field::ensure_distinct_keys;
use crate::{ArgumentValue, Field, QueryBuildError};

/// The kind of top-level operation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OperationKind {
    /// A read-only query.
    Query,
    /// A mutation.
    Mutation,
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Query => write!(f, "query"),
            OperationKind::Mutation => write!(f, "mutation"),
        }
    }
}

/// A top-level operation: a kind, an optional name, and its root fields.
#[derive(Debug, PartialEq, Clone)]
pub struct Operation {
    kind: OperationKind,
    name: Option<String>,
    roots: Vec<Field>,
}

impl Operation {
    /// Create a query operation from its root fields.
    pub fn query(roots: Vec<Field>) -> Result<Self, QueryBuildError> {
        Self::new(OperationKind::Query, roots)
    }

    /// Create a mutation operation from its root fields.
    pub fn mutation(roots: Vec<Field>) -> Result<Self, QueryBuildError> {
        Self::new(OperationKind::Mutation, roots)
    }

    fn new(kind: OperationKind, roots: Vec<Field>) -> Result<Self, QueryBuildError> {
        ensure_distinct_keys(&roots)?;
        Ok(Self {
            kind,
            name: None,
            roots,
        })
    }

    /// Attach an operation name, emitted after the operation kind.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Serialize the tree into wire-ready query text and a variables map.
    ///
    /// Variable declarations are collected in first-encountered
    /// depth-first order. Empty field, argument, or variable names and
    /// conflicting variable declarations fail here, before any request
    /// is made.
    pub fn into_document(self) -> Result<Document, QueryBuildError> {
        let mut declarations: Vec<(String, String)> = Vec::new();
        let mut variables = serde_json::Map::new();

        for root in &self.roots {
            collect_field(root, &mut declarations, &mut variables)?;
        }

        let mut text = String::new();
        // Infallible: fmt::Write on String never errors.
        let _ = write!(text, "{}", self.kind);
        if let Some(name) = &self.name {
            let _ = write!(text, " {}", name);
        }
        if !declarations.is_empty() {
            for (i, (name, graphql_type)) in declarations.iter().enumerate() {
                match i {
                    0 => {
                        let _ = write!(text, "(${}: {}", name, graphql_type);
                    }
                    _ => {
                        let _ = write!(text, ", ${}: {}", name, graphql_type);
                    }
                }
            }
            text.push(')');
        }
        text.push_str(" {");
        for root in &self.roots {
            let _ = write!(text, " {}", root);
        }
        text.push_str(" }");

        Ok(Document { text, variables })
    }
}

fn collect_field(
    field: &Field,
    declarations: &mut Vec<(String, String)>,
    variables: &mut serde_json::Map<String, serde_json::Value>,
) -> Result<(), QueryBuildError> {
    if field.name().is_empty() {
        return Err(QueryBuildError::EmptyFieldName);
    }
    for (name, value) in field.args() {
        if name.is_empty() {
            return Err(QueryBuildError::EmptyArgumentName);
        }
        collect_value(value, declarations, variables)?;
    }
    for child in field.selection() {
        collect_field(child, declarations, variables)?;
    }
    Ok(())
}

fn collect_value(
    value: &ArgumentValue,
    declarations: &mut Vec<(String, String)>,
    variables: &mut serde_json::Map<String, serde_json::Value>,
) -> Result<(), QueryBuildError> {
    match value {
        ArgumentValue::Float(x) if !x.is_finite() => {
            Err(QueryBuildError::NonFiniteFloat { value: *x })
        }
        ArgumentValue::Variable(var) => {
            if var.name().is_empty() {
                return Err(QueryBuildError::EmptyVariableName);
            }
            if let Some((_, existing)) = declarations.iter().find(|(name, _)| name == var.name()) {
                if existing != var.graphql_type() {
                    return Err(QueryBuildError::VariableTypeConflict {
                        name: var.name().to_string(),
                        first: existing.clone(),
                        second: var.graphql_type().to_string(),
                    });
                }
            } else {
                declarations.push((var.name().to_string(), var.graphql_type().to_string()));
                variables.insert(var.name().to_string(), var.value().clone());
            }
            Ok(())
        }
        ArgumentValue::List(items) => {
            for item in items {
                collect_value(item, declarations, variables)?;
            }
            Ok(())
        }
        ArgumentValue::Object(entries) => {
            for (_, entry) in entries {
                collect_value(entry, declarations, variables)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// A serialized operation: query text plus its variables map.
///
/// Serializes directly as the GraphQL HTTP request body,
/// `{"query": ..., "variables": ...}`.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Document {
    #[serde(rename = "query")]
    text: String,
    variables: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    /// The wire-ready query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The outgoing variables map.
    pub const fn variables(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.variables
    }

    /// Set or replace a variable's runtime value.
    ///
    /// Used by callers that re-issue one document with different
    /// values, such as a pagination loop bumping `page`.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.variables.insert(name.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Variable;
    use pretty_assertions::assert_eq;

    fn avatar_query() -> Operation {
        let field = Field::new("User")
            .arg("name", "somebody")
            .select(vec![Field::new("avatar")
                .select(vec![Field::new("large")])
                .unwrap()])
            .unwrap();
        Operation::query(vec![field]).unwrap()
    }

    #[test]
    fn it_encodes_a_whole_query() -> Result<(), QueryBuildError> {
        let document = avatar_query().into_document()?;
        assert_eq!(
            document.text(),
            r#"query { User(name: "somebody") { avatar { large } } }"#
        );
        assert!(document.variables().is_empty());
        Ok(())
    }

    #[test]
    fn serialization_is_deterministic() -> Result<(), QueryBuildError> {
        let first = avatar_query().into_document()?;
        let second = avatar_query().into_document()?;
        assert_eq!(first.text(), second.text());
        assert_eq!(first.variables(), second.variables());
        Ok(())
    }

    #[test]
    fn structurally_distinct_trees_serialize_differently() -> Result<(), QueryBuildError> {
        let with_arg = Operation::query(vec![Field::new("User").arg("name", "a")])?
            .into_document()?;
        let without_arg = Operation::query(vec![Field::new("User")])?.into_document()?;
        assert_ne!(with_arg.text(), without_arg.text());
        Ok(())
    }

    #[test]
    fn it_hoists_variables_in_first_encountered_order() -> Result<(), QueryBuildError> {
        let page = Field::new("Page")
            .arg("page", Variable::new("page", "Int", 1))
            .arg("perPage", Variable::new("perPage", "Int", 50))
            .select(vec![
                Field::new("pageInfo")
                    .select(vec![Field::new("hasNextPage")])?,
                Field::new("mediaList")
                    .arg("userName", Variable::new("userName", "String", "somebody"))
                    .select(vec![Field::new("id")])?,
            ])?;
        let document = Operation::query(vec![page])?.into_document()?;

        assert_eq!(
            document.text(),
            "query($page: Int, $perPage: Int, $userName: String) \
             { Page(page: $page, perPage: $perPage) \
             { pageInfo { hasNextPage } mediaList(userName: $userName) { id } } }"
        );
        assert_eq!(
            serde_json::to_value(document.variables()).unwrap(),
            serde_json::json!({"page": 1, "perPage": 50, "userName": "somebody"})
        );
        Ok(())
    }

    #[test]
    fn it_finds_variables_inside_lists_and_objects() -> Result<(), QueryBuildError> {
        let field = Field::new("mediaList").arg(
            "filter",
            ArgumentValue::Object(vec![(
                "statuses".to_string(),
                ArgumentValue::List(vec![ArgumentValue::Variable(Variable::new(
                    "statusIn",
                    "[MediaListStatus]",
                    serde_json::json!(["COMPLETED"]),
                ))]),
            )]),
        );
        let document = Operation::query(vec![field])?.into_document()?;
        assert_eq!(
            document.text(),
            "query($statusIn: [MediaListStatus]) { mediaList(filter: {statuses: [$statusIn]}) }"
        );
        Ok(())
    }

    #[test]
    fn it_rejects_conflicting_variable_declarations() {
        let field = Field::new("Page")
            .arg("page", Variable::new("page", "Int", 1))
            .arg("pageAgain", Variable::new("page", "String", 1));
        let result = Operation::query(vec![field]).unwrap().into_document();
        assert_eq!(
            result.unwrap_err(),
            QueryBuildError::VariableTypeConflict {
                name: "page".to_string(),
                first: "Int".to_string(),
                second: "String".to_string(),
            }
        );
    }

    #[test]
    fn it_rejects_non_finite_floats() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let field = Field::new("Media").arg("averageScore_greater", ArgumentValue::Float(bad));
            let result = Operation::query(vec![field]).unwrap().into_document();
            assert!(matches!(
                result.unwrap_err(),
                QueryBuildError::NonFiniteFloat { .. }
            ));
        }
    }

    #[test]
    fn it_rejects_empty_field_names() {
        let result = Operation::query(vec![Field::new("")])
            .unwrap()
            .into_document();
        assert_eq!(result.unwrap_err(), QueryBuildError::EmptyFieldName);
    }

    #[test]
    fn it_rejects_duplicate_root_keys() {
        let result = Operation::query(vec![Field::new("User"), Field::new("User")]);
        assert_eq!(
            result.unwrap_err(),
            QueryBuildError::DuplicateOutputKey {
                key: "User".to_string()
            }
        );
    }

    #[test]
    fn it_encodes_named_mutations() -> Result<(), QueryBuildError> {
        let toggle = Field::new("ToggleFavourite")
            .arg("animeId", Variable::new("animeId", "Int", 1))
            .select(vec![Field::new("anime")
                .select(vec![Field::new("pageInfo")
                    .select(vec![Field::new("total")])?])?])?;
        let document = Operation::mutation(vec![toggle])?
            .named("Favourite")
            .into_document()?;
        assert_eq!(
            document.text(),
            "mutation Favourite($animeId: Int) \
             { ToggleFavourite(animeId: $animeId) { anime { pageInfo { total } } } }"
        );
        Ok(())
    }
}

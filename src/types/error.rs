use std::num::ParseIntError;

use thiserror::Error;

use super::operator::Operator;

/// Boxed error returned by custom field parsers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while building or evaluating rules.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("malformed rule key '{key}'")]
    MalformedKey { key: String },

    #[error("unrecognized operator '{alias}'")]
    UnrecognizedOperator { alias: String },

    #[error("field '{field}' does not exist")]
    UnknownField { field: String },

    #[error("invalid integer '{text}' for field '{field}': {source}")]
    InvalidNumber {
        field: String,
        text: String,
        source: ParseIntError,
    },

    #[error("invalid value '{text}' for field '{field}': {source}")]
    InvalidFieldValue {
        field: String,
        text: String,
        source: BoxError,
    },

    #[error("field '{field}' has type '{kind}', which cannot be parsed from text")]
    UnsupportedFieldType { field: String, kind: String },

    #[error("field '{field}' has type '{type_name}', which does not support the '{op}' operator")]
    OperatorTypeMismatch {
        field: String,
        op: Operator,
        type_name: String,
    },

    #[error("type mismatch: expected '{expected}' but got '{found}'")]
    TypeMismatch { expected: String, found: String },

    #[error("operator '{op}' does not support values of type '{type_name}'")]
    UnsupportedType { op: Operator, type_name: String },

    #[error("key '{key}' appeared multiple times with values '{}'", values.join(", "))]
    DuplicateKey { key: String, values: Vec<String> },

    #[error("key '{key}' has no value")]
    MissingValue { key: String },

    #[error("failed to evaluate '{rule}': {source}")]
    Evaluation {
        rule: String,
        source: Box<FilterError>,
    },
}

impl FilterError {
    /// The innermost error, skipping any [`FilterError::Evaluation`] wrappers.
    #[must_use]
    pub fn root(&self) -> &FilterError {
        match self {
            FilterError::Evaluation { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_key_message() {
        let err = FilterError::MalformedKey {
            key: "name[like".into(),
        };
        assert_eq!(err.to_string(), "malformed rule key 'name[like'");
    }

    #[test]
    fn duplicate_key_message() {
        let err = FilterError::DuplicateKey {
            key: "title".into(),
            values: vec!["App1".into(), "App2".into()],
        };
        assert_eq!(
            err.to_string(),
            "key 'title' appeared multiple times with values 'App1, App2'"
        );
    }

    #[test]
    fn operator_type_mismatch_message() {
        let err = FilterError::OperatorTypeMismatch {
            field: "age".into(),
            op: Operator::Like,
            type_name: "i32".into(),
        };
        assert_eq!(
            err.to_string(),
            "field 'age' has type 'i32', which does not support the 'Like' operator"
        );
    }

    #[test]
    fn evaluation_wraps_source() {
        let err = FilterError::Evaluation {
            rule: "age[gt]=5".into(),
            source: Box::new(FilterError::TypeMismatch {
                expected: "i32".into(),
                found: "string".into(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "failed to evaluate 'age[gt]=5': type mismatch: expected 'i32' but got 'string'"
        );
        assert!(matches!(err.root(), FilterError::TypeMismatch { .. }));
    }

    #[test]
    fn root_of_unwrapped_error_is_itself() {
        let err = FilterError::UnknownField {
            field: "website".into(),
        };
        assert!(matches!(err.root(), FilterError::UnknownField { field } if field == "website"));
    }
}

use std::fmt;

use super::error::FilterError;
use super::operator::Operator;
use super::schema::{FieldValue, Schema};
use super::value::Value;
use crate::parse::split_key;
use crate::store::Record;

/// A single `field[op]=value` predicate.
///
/// The value always has the native type of the field it was parsed against
/// and is valid for the operator. Rules are immutable; all validation happens
/// on construction.
///
/// ```text
/// name[like]=Tom    name contains "Tom"
/// name=Tom          name is exactly "Tom"
/// age[gt]=25        age > 25
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    field: String,
    op: Operator,
    value: Value,
}

impl Rule {
    /// Parse a rule key and its value text against `schema`.
    ///
    /// The field is looked up ignoring case and the value is coerced into the
    /// field's declared type.
    ///
    /// # Errors
    ///
    /// Any of [`FilterError::MalformedKey`], [`FilterError::UnrecognizedOperator`],
    /// [`FilterError::UnknownField`], [`FilterError::InvalidNumber`],
    /// [`FilterError::InvalidFieldValue`], [`FilterError::UnsupportedFieldType`]
    /// or [`FilterError::OperatorTypeMismatch`].
    pub fn parse<R>(key: &str, text: &str, schema: &Schema<R>) -> Result<Rule, FilterError> {
        let (name, alias) = split_key(key)?;
        let op = Operator::parse(alias)?;
        let def = schema.get(name).ok_or_else(|| FilterError::UnknownField {
            field: name.to_owned(),
        })?;
        let value = def.kind().coerce(name, text)?;
        Rule::new(name, op, value)
    }

    /// Parse a whole `key=value` fragment. Only the first `=` separates the
    /// key from the value.
    ///
    /// # Errors
    ///
    /// [`FilterError::MalformedKey`] when there is no `=`, otherwise as
    /// [`Rule::parse`].
    pub fn parse_pair<R>(pair: &str, schema: &Schema<R>) -> Result<Rule, FilterError> {
        let (key, text) = pair.split_once('=').ok_or_else(|| FilterError::MalformedKey {
            key: pair.to_owned(),
        })?;
        Rule::parse(key, text, schema)
    }

    /// Build a rule from an already-typed value. The field is not checked
    /// against any schema until the rule is matched.
    ///
    /// # Errors
    ///
    /// [`FilterError::OperatorTypeMismatch`] when `op` does not accept the
    /// value's type.
    pub fn new(
        field: impl Into<String>,
        op: Operator,
        value: impl Into<Value>,
    ) -> Result<Rule, FilterError> {
        let field = field.into();
        let value = value.into();
        if !op.is_valid_for(&value) {
            return Err(FilterError::OperatorTypeMismatch {
                field,
                op,
                type_name: value.type_name().to_owned(),
            });
        }
        Ok(Rule { field, op, value })
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn op(&self) -> Operator {
        self.op
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether `candidate` satisfies this rule.
    ///
    /// # Errors
    ///
    /// [`FilterError::Evaluation`] wrapping the operator's error.
    pub fn evaluate(&self, candidate: &Value) -> Result<bool, FilterError> {
        self.op
            .evaluate(candidate, &self.value)
            .map_err(|source| FilterError::Evaluation {
                rule: self.to_string(),
                source: Box::new(source),
            })
    }

    /// Evaluate against a field's value(s). A multi-valued field matches when
    /// any element matches; an empty one never matches.
    ///
    /// # Errors
    ///
    /// The first error produced by [`Rule::evaluate`].
    pub fn evaluate_field(&self, candidate: &FieldValue) -> Result<bool, FilterError> {
        match candidate {
            FieldValue::One(value) => self.evaluate(value),
            FieldValue::Many(values) => {
                for value in values {
                    if self.evaluate(value)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Resolve this rule's field on `record` through the record type's schema
    /// and evaluate it.
    ///
    /// # Errors
    ///
    /// [`FilterError::UnknownField`] when the schema has no such field, or
    /// the error from [`Rule::evaluate_field`].
    pub fn matches<R: Record>(&self, record: &R) -> Result<bool, FilterError> {
        self.matches_with(record, R::schema())
    }

    /// Like [`Rule::matches`] with an explicit schema.
    ///
    /// # Errors
    ///
    /// As [`Rule::matches`].
    pub fn matches_with<R>(&self, record: &R, schema: &Schema<R>) -> Result<bool, FilterError> {
        let def = schema
            .get(&self.field)
            .ok_or_else(|| FilterError::UnknownField {
                field: self.field.clone(),
            })?;
        self.evaluate_field(&def.get(record))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            Operator::Equals => write!(f, "{}={}", self.field, self.value),
            op => write!(f, "{}[{}]={}", self.field, op.alias(), self.value),
        }
    }
}

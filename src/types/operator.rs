use std::cmp::Ordering;
use std::fmt;

use super::error::FilterError;
use super::value::Value;

/// Comparison operators usable in rule keys.
///
/// The operator is written in brackets after the field name:
///
/// ```text
/// name[like]=Tom    name contains "Tom"
/// name=Tom          name is exactly "Tom"
/// age[gt]=25        age > 25
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    Like,
    LessThan,
    GreaterThan,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 4] = [
        Operator::Equals,
        Operator::Like,
        Operator::LessThan,
        Operator::GreaterThan,
    ];

    /// Resolve a bracketed alias. Matching is case-insensitive and an empty
    /// alias means [`Operator::Equals`].
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnrecognizedOperator`] for any other alias.
    pub fn parse(alias: &str) -> Result<Operator, FilterError> {
        match alias.to_ascii_lowercase().as_str() {
            "" | "eq" => Ok(Operator::Equals),
            "like" => Ok(Operator::Like),
            "lt" => Ok(Operator::LessThan),
            "gt" => Ok(Operator::GreaterThan),
            _ => Err(FilterError::UnrecognizedOperator {
                alias: alias.to_owned(),
            }),
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Operator::Equals => "Equals",
            Operator::Like => "Like",
            Operator::LessThan => "LessThan",
            Operator::GreaterThan => "GreaterThan",
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equals => "==",
            Operator::Like => "like",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
        }
    }

    /// The alias written between brackets in a rule key.
    #[must_use]
    pub fn alias(self) -> &'static str {
        match self {
            Operator::Equals => "eq",
            Operator::Like => "like",
            Operator::LessThan => "lt",
            Operator::GreaterThan => "gt",
        }
    }

    /// Whether this operator accepts values of `value`'s type.
    ///
    /// `Equals` accepts anything, `Like` only text, and `LessThan` /
    /// `GreaterThan` integers or custom values with the ordering capability.
    #[must_use]
    pub fn is_valid_for(self, value: &Value) -> bool {
        match self {
            Operator::Equals => true,
            Operator::Like => value.is_text(),
            Operator::LessThan | Operator::GreaterThan => value.is_ordered(),
        }
    }

    /// Apply the operator to a candidate value and the rule's threshold, e.g.
    /// `LessThan.evaluate(5, 10)` is `5 < 10`.
    ///
    /// # Errors
    ///
    /// [`FilterError::TypeMismatch`] when the two values differ in runtime
    /// type, [`FilterError::UnsupportedType`] when the operator rejects it.
    pub fn evaluate(self, incoming: &Value, threshold: &Value) -> Result<bool, FilterError> {
        if !incoming.same_type(threshold) {
            return Err(FilterError::TypeMismatch {
                expected: threshold.type_name().to_owned(),
                found: incoming.type_name().to_owned(),
            });
        }
        if !self.is_valid_for(incoming) {
            return Err(self.unsupported(incoming));
        }

        match self {
            Operator::Equals => Ok(incoming == threshold),
            Operator::Like => match (incoming, threshold) {
                (Value::Text(haystack), Value::Text(needle)) => {
                    Ok(haystack.contains(needle.as_str()))
                }
                _ => Err(self.unsupported(incoming)),
            },
            Operator::LessThan => self.order(incoming, threshold, Ordering::Less),
            Operator::GreaterThan => self.order(incoming, threshold, Ordering::Greater),
        }
    }

    fn order(
        self,
        incoming: &Value,
        threshold: &Value,
        want: Ordering,
    ) -> Result<bool, FilterError> {
        if let Some(ord) = incoming.cmp_integer(threshold) {
            return Ok(ord == want);
        }
        let result = match (incoming, threshold) {
            (Value::Custom(a), Value::Custom(b)) if want == Ordering::Less => a.less_than(b),
            (Value::Custom(a), Value::Custom(b)) => a.greater_than(b),
            _ => None,
        };
        result.ok_or_else(|| self.unsupported(incoming))
    }

    fn unsupported(self, value: &Value) -> FilterError {
        FilterError::UnsupportedType {
            op: self,
            type_name: value.type_name().to_owned(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_aliases() {
        assert_eq!(Operator::parse("").unwrap(), Operator::Equals);
        assert_eq!(Operator::parse("eq").unwrap(), Operator::Equals);
        assert_eq!(Operator::parse("like").unwrap(), Operator::Like);
        assert_eq!(Operator::parse("lt").unwrap(), Operator::LessThan);
        assert_eq!(Operator::parse("gt").unwrap(), Operator::GreaterThan);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Operator::parse("LIKE").unwrap(), Operator::Like);
        assert_eq!(Operator::parse("Gt").unwrap(), Operator::GreaterThan);
        assert_eq!(Operator::parse("lT").unwrap(), Operator::LessThan);
    }

    #[test]
    fn parse_unknown_alias() {
        let err = Operator::parse("between").unwrap_err();
        assert!(matches!(err, FilterError::UnrecognizedOperator { alias } if alias == "between"));
    }

    #[test]
    fn every_alias_round_trips() {
        for op in Operator::ALL {
            assert_eq!(Operator::parse(op.alias()).unwrap(), op);
        }
    }

    #[test]
    fn display_and_symbols() {
        assert_eq!(Operator::GreaterThan.to_string(), "GreaterThan");
        assert_eq!(Operator::Equals.symbol(), "==");
        assert_eq!(Operator::LessThan.symbol(), "<");
    }

    #[test]
    fn validity_per_type() {
        let text = Value::from("x");
        let int = Value::from(3_i32);
        let flag = Value::from(true);

        assert!(Operator::Equals.is_valid_for(&text));
        assert!(Operator::Equals.is_valid_for(&int));
        assert!(Operator::Equals.is_valid_for(&flag));

        assert!(Operator::Like.is_valid_for(&text));
        assert!(!Operator::Like.is_valid_for(&int));

        assert!(Operator::LessThan.is_valid_for(&int));
        assert!(!Operator::LessThan.is_valid_for(&text));
        assert!(!Operator::GreaterThan.is_valid_for(&flag));
    }

    #[test]
    fn equals_is_case_sensitive() {
        assert!(Operator::Equals
            .evaluate(&Value::from("Tom"), &Value::from("Tom"))
            .unwrap());
        assert!(!Operator::Equals
            .evaluate(&Value::from("Tom"), &Value::from("tom"))
            .unwrap());
    }

    #[test]
    fn like_is_substring() {
        assert!(Operator::Like
            .evaluate(&Value::from("Green"), &Value::from("ree"))
            .unwrap());
        assert!(!Operator::Like
            .evaluate(&Value::from("Green"), &Value::from("blue"))
            .unwrap());
        assert!(Operator::Like
            .evaluate(&Value::from("Green"), &Value::from(""))
            .unwrap());
    }

    #[test]
    fn like_rejects_integers() {
        let err = Operator::Like
            .evaluate(&Value::from(5_i32), &Value::from(3_i32))
            .unwrap_err();
        assert!(matches!(
            err,
            FilterError::UnsupportedType { op: Operator::Like, type_name } if type_name == "i32"
        ));
    }

    #[test]
    fn integer_ordering() {
        assert!(Operator::LessThan
            .evaluate(&Value::from(5_i64), &Value::from(10_i64))
            .unwrap());
        assert!(!Operator::LessThan
            .evaluate(&Value::from(10_i64), &Value::from(10_i64))
            .unwrap());
        assert!(Operator::GreaterThan
            .evaluate(&Value::from(200_u8), &Value::from(100_u8))
            .unwrap());
        assert!(Operator::GreaterThan
            .evaluate(&Value::from(-1_i8), &Value::from(-2_i8))
            .unwrap());
    }

    #[test]
    fn type_mismatch() {
        let err = Operator::Equals
            .evaluate(&Value::from("5"), &Value::from(5_i32))
            .unwrap_err();
        assert!(matches!(
            err,
            FilterError::TypeMismatch { expected, found } if expected == "i32" && found == "string"
        ));
    }

    #[test]
    fn width_mismatch_is_type_mismatch() {
        let err = Operator::LessThan
            .evaluate(&Value::from(5_i32), &Value::from(5_i64))
            .unwrap_err();
        assert!(matches!(err, FilterError::TypeMismatch { .. }));
    }

    #[test]
    fn ordering_rejects_bool() {
        let err = Operator::GreaterThan
            .evaluate(&Value::from(true), &Value::from(false))
            .unwrap_err();
        assert!(matches!(err, FilterError::UnsupportedType { .. }));
    }
}

use std::fmt;

use indexmap::IndexMap;
use log::debug;

use super::error::FilterError;
use super::rule::Rule;
use super::schema::Schema;
use crate::store::Record;

/// An ordered conjunction of [`Rule`]s.
///
/// Rules are evaluated in insertion order and evaluation stops at the first
/// rule that does not match. An empty set matches every record.
///
/// # Example
///
/// ```
/// use querysift::{AppMeta, Record, RuleSet};
///
/// let rules = RuleSet::from_pairs(
///     [("title[like]", "App"), ("version[gt]", "0.0.1")],
///     AppMeta::schema(),
/// )
/// .unwrap();
/// assert_eq!(rules.len(), 2);
/// assert_eq!(rules.to_string(), "title[like]=App&version[gt]=0.0.1");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Insertion order is evaluation order.
    pub fn add(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Builder-style [`RuleSet::add`].
    #[must_use]
    pub fn with(mut self, rule: Rule) -> Self {
        self.add(rule);
        self
    }

    /// Build a rule set from query parameters where each key maps to the
    /// values it was given. Every key must carry exactly one value.
    ///
    /// # Errors
    ///
    /// [`FilterError::DuplicateKey`] for a key with several values,
    /// [`FilterError::MissingValue`] for a key with none, or the first error
    /// from [`Rule::parse`]. No partial rule set is returned.
    pub fn from_multimap<R>(
        params: &IndexMap<String, Vec<String>>,
        schema: &Schema<R>,
    ) -> Result<Self, FilterError> {
        let mut ruleset = RuleSet::new();
        for (key, values) in params {
            let value = match values.as_slice() {
                [single] => single,
                [] => return Err(FilterError::MissingValue { key: key.clone() }),
                _ => {
                    return Err(FilterError::DuplicateKey {
                        key: key.clone(),
                        values: values.clone(),
                    })
                }
            };
            ruleset.add(Rule::parse(key, value, schema)?);
        }
        debug!("built rule set from {} parameters: {ruleset}", params.len());
        Ok(ruleset)
    }

    /// Build a rule set from decoded `(key, value)` query pairs. Pairs are
    /// grouped by key in first-appearance order before parsing, so a repeated
    /// key is reported as [`FilterError::DuplicateKey`].
    ///
    /// # Errors
    ///
    /// As [`RuleSet::from_multimap`].
    pub fn from_pairs<R, I, K, V>(pairs: I, schema: &Schema<R>) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut params: IndexMap<String, Vec<String>> = IndexMap::new();
        for (key, value) in pairs {
            params.entry(key.into()).or_default().push(value.into());
        }
        Self::from_multimap(&params, schema)
    }

    /// Whether `record` satisfies every rule, resolving fields through the
    /// record type's schema.
    ///
    /// # Errors
    ///
    /// The first error raised by a rule; later rules are not evaluated.
    pub fn matches<R: Record>(&self, record: &R) -> Result<bool, FilterError> {
        self.matches_with(record, R::schema())
    }

    /// Like [`RuleSet::matches`] with an explicit schema.
    ///
    /// # Errors
    ///
    /// As [`RuleSet::matches`].
    pub fn matches_with<R>(&self, record: &R, schema: &Schema<R>) -> Result<bool, FilterError> {
        for rule in &self.rules {
            if !rule.matches_with(record, schema)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Extend<Rule> for RuleSet {
    fn extend<T: IntoIterator<Item = Rule>>(&mut self, iter: T) {
        self.rules.extend(iter);
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        RuleSet {
            rules: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}

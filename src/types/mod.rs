mod error;
mod operator;
mod rule;
mod ruleset;
mod schema;
mod value;

pub use error::{BoxError, FilterError};
pub use operator::Operator;
pub use rule::Rule;
pub use ruleset::RuleSet;
pub use schema::{FieldDef, FieldKind, FieldValue, ParseFn, Schema, SchemaBuilder};
pub use value::{CustomValue, OrderedValue, Value};

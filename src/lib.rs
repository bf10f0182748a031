mod app;
mod parse;
mod store;
mod types;
mod version;

pub use app::{AppKey, AppMeta, Maintainer, MetaError};
pub use store::{ListError, Record, Store, StoreError};
pub use types::{
    BoxError, CustomValue, FieldDef, FieldKind, FieldValue, FilterError, Operator, OrderedValue,
    ParseFn, Rule, RuleSet, Schema, SchemaBuilder, Value,
};
pub use version::{Version, VersionError};

use std::collections::HashMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use super::error::{BoxError, FilterError};
use super::value::{short_type_name, OrderedValue, Value};

/// Parses text into a custom field value.
pub type ParseFn = fn(&str) -> Result<Value, BoxError>;

/// Declared type of a schema field. Determines how rule values are coerced
/// from text and which operators can apply.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Bool,
    /// A custom type. Fields without a parser cannot appear in parsed rules.
    Custom {
        type_name: &'static str,
        parse: Option<ParseFn>,
    },
}

impl FieldKind {
    /// A custom kind parsed with `T::from_str` and carrying the ordering
    /// capability, so every operator except `like` applies.
    #[must_use]
    pub fn ordered<T>() -> Self
    where
        T: FromStr + OrderedValue + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        FieldKind::Custom {
            type_name: short_type_name::<T>(),
            parse: Some(parse_ordered::<T>),
        }
    }

    /// A custom kind parsed with `T::from_str`, usable with equality only.
    #[must_use]
    pub fn parsed<T>() -> Self
    where
        T: FromStr + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        FieldKind::Custom {
            type_name: short_type_name::<T>(),
            parse: Some(parse_plain::<T>),
        }
    }

    /// A custom kind with no text form. Rules on such fields can only be
    /// built programmatically with [`Rule::new`](crate::Rule::new).
    #[must_use]
    pub fn opaque(type_name: &'static str) -> Self {
        FieldKind::Custom {
            type_name,
            parse: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::I8 => "i8",
            FieldKind::I16 => "i16",
            FieldKind::I32 => "i32",
            FieldKind::I64 => "i64",
            FieldKind::U8 => "u8",
            FieldKind::U16 => "u16",
            FieldKind::U32 => "u32",
            FieldKind::U64 => "u64",
            FieldKind::Bool => "bool",
            FieldKind::Custom { type_name, .. } => *type_name,
        }
    }

    /// Coerce `text` into a value of this kind for the field `field`.
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidNumber`] for unparseable integers,
    /// [`FilterError::InvalidFieldValue`] when a custom parser fails and
    /// [`FilterError::UnsupportedFieldType`] for kinds with no text form.
    pub fn coerce(&self, field: &str, text: &str) -> Result<Value, FilterError> {
        let invalid_number = |source| FilterError::InvalidNumber {
            field: field.to_owned(),
            text: text.to_owned(),
            source,
        };
        match self {
            FieldKind::Text => Ok(Value::Text(text.to_owned())),
            FieldKind::I8 => text.parse().map(Value::I8).map_err(invalid_number),
            FieldKind::I16 => text.parse().map(Value::I16).map_err(invalid_number),
            FieldKind::I32 => text.parse().map(Value::I32).map_err(invalid_number),
            FieldKind::I64 => text.parse().map(Value::I64).map_err(invalid_number),
            FieldKind::U8 => parse_unsigned(text).map(Value::U8).map_err(invalid_number),
            FieldKind::U16 => parse_unsigned(text).map(Value::U16).map_err(invalid_number),
            FieldKind::U32 => parse_unsigned(text).map(Value::U32).map_err(invalid_number),
            FieldKind::U64 => parse_unsigned(text).map(Value::U64).map_err(invalid_number),
            FieldKind::Custom {
                parse: Some(parse), ..
            } => parse(text).map_err(|source| FilterError::InvalidFieldValue {
                field: field.to_owned(),
                text: text.to_owned(),
                source,
            }),
            FieldKind::Bool | FieldKind::Custom { parse: None, .. } => {
                Err(FilterError::UnsupportedFieldType {
                    field: field.to_owned(),
                    kind: self.name().to_owned(),
                })
            }
        }
    }
}

// Unsigned values take digits only. A lone sign never parses, so `+5` fails
// with the same invalid-digit error as any other stray character.
fn parse_unsigned<T: FromStr<Err = ParseIntError>>(text: &str) -> Result<T, ParseIntError> {
    if text.starts_with('+') {
        return "+".parse();
    }
    text.parse()
}

fn parse_ordered<T>(text: &str) -> Result<Value, BoxError>
where
    T: FromStr + OrderedValue + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.parse::<T>().map(Value::ordered).map_err(Into::into)
}

fn parse_plain<T>(text: &str) -> Result<Value, BoxError>
where
    T: FromStr + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.parse::<T>().map(Value::custom).map_err(Into::into)
}

/// The value(s) a record holds for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    One(Value),
    /// A multi-valued field, e.g. the names of every maintainer. A rule
    /// matches when any element matches.
    Many(Vec<Value>),
}

type Accessor<R> = Box<dyn Fn(&R) -> FieldValue + Send + Sync>;

/// One named, typed field of a record schema.
pub struct FieldDef<R> {
    name: String,
    kind: FieldKind,
    accessor: Accessor<R>,
}

impl<R> FieldDef<R> {
    /// The field name as registered.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Read this field from a record.
    pub fn get(&self, record: &R) -> FieldValue {
        (self.accessor)(record)
    }
}

impl<R> fmt::Debug for FieldDef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Field descriptor for a record type: maps field names, case-insensitively,
/// to their kind and accessor.
///
/// Built once per record type with [`Schema::builder`].
pub struct Schema<R> {
    fields: Vec<FieldDef<R>>,
    index: HashMap<String, usize>,
}

impl<R> Schema<R> {
    #[must_use]
    pub fn builder() -> SchemaBuilder<R> {
        SchemaBuilder {
            schema: Schema {
                fields: Vec::new(),
                index: HashMap::new(),
            },
        }
    }

    /// Look up a field by name, ignoring ASCII case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDef<R>> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&idx| &self.fields[idx])
    }

    /// Fields in registration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef<R>> {
        self.fields.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn register(&mut self, def: FieldDef<R>) {
        let key = def.name.to_ascii_lowercase();
        if let Some(&idx) = self.index.get(&key) {
            self.fields[idx] = def;
            return;
        }
        self.index.insert(key, self.fields.len());
        self.fields.push(def);
    }
}

impl<R> fmt::Debug for Schema<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.fields.iter()).finish()
    }
}

/// Builder for a [`Schema`]. Registering a name that is already present
/// (ignoring case) replaces the earlier field.
#[derive(Debug)]
pub struct SchemaBuilder<R> {
    schema: Schema<R>,
}

impl<R> SchemaBuilder<R> {
    /// Register a single-valued field.
    #[must_use]
    pub fn field(
        mut self,
        name: &str,
        kind: FieldKind,
        get: impl Fn(&R) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.schema.register(FieldDef {
            name: name.to_owned(),
            kind,
            accessor: Box::new(move |r| FieldValue::One(get(r))),
        });
        self
    }

    /// Register a multi-valued field.
    #[must_use]
    pub fn many(
        mut self,
        name: &str,
        kind: FieldKind,
        get: impl Fn(&R) -> Vec<Value> + Send + Sync + 'static,
    ) -> Self {
        self.schema.register(FieldDef {
            name: name.to_owned(),
            kind,
            accessor: Box::new(move |r| FieldValue::Many(get(r))),
        });
        self
    }

    #[must_use]
    pub fn build(self) -> Schema<R> {
        self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Employee {
        name: String,
        age: u8,
        skills: Vec<String>,
    }

    fn schema() -> Schema<Employee> {
        Schema::builder()
            .field("Name", FieldKind::Text, |e: &Employee| e.name.as_str().into())
            .field("age", FieldKind::U8, |e: &Employee| e.age.into())
            .many("skill", FieldKind::Text, |e: &Employee| {
                e.skills.iter().map(Value::from).collect()
            })
            .build()
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let schema = schema();
        assert_eq!(schema.get("name").unwrap().name(), "Name");
        assert_eq!(schema.get("NAME").unwrap().name(), "Name");
        assert_eq!(schema.get("AgE").unwrap().name(), "age");
        assert!(schema.get("salary").is_none());
    }

    #[test]
    fn fields_keep_registration_order() {
        let schema = schema();
        let names: Vec<&str> = schema.fields().map(FieldDef::name).collect();
        assert_eq!(names, ["Name", "age", "skill"]);
        assert_eq!(schema.len(), 3);
        assert!(!schema.is_empty());
    }

    #[test]
    fn duplicate_registration_replaces() {
        let schema = Schema::builder()
            .field("age", FieldKind::U8, |e: &Employee| e.age.into())
            .field("AGE", FieldKind::Text, |e: &Employee| e.age.to_string().into())
            .build();
        assert_eq!(schema.len(), 1);
        assert!(matches!(schema.get("age").unwrap().kind(), FieldKind::Text));
    }

    #[test]
    fn accessors_read_records() {
        let schema = schema();
        let e = Employee {
            name: "Tom".into(),
            age: 30,
            skills: vec!["rust".into(), "go".into()],
        };
        assert_eq!(
            schema.get("name").unwrap().get(&e),
            FieldValue::One(Value::from("Tom"))
        );
        assert_eq!(
            schema.get("age").unwrap().get(&e),
            FieldValue::One(Value::U8(30))
        );
        assert_eq!(
            schema.get("skill").unwrap().get(&e),
            FieldValue::Many(vec![Value::from("rust"), Value::from("go")])
        );
    }

    #[test]
    fn coerce_integers_by_width() {
        assert_eq!(FieldKind::I16.coerce("n", "-300").unwrap(), Value::I16(-300));
        assert_eq!(FieldKind::U64.coerce("n", "42").unwrap(), Value::U64(42));
        assert!(matches!(
            FieldKind::U8.coerce("age", "300"),
            Err(FilterError::InvalidNumber { field, text, .. }) if field == "age" && text == "300"
        ));
        assert!(matches!(
            FieldKind::U32.coerce("n", "-1"),
            Err(FilterError::InvalidNumber { .. })
        ));
        assert!(matches!(
            FieldKind::I32.coerce("n", "abc"),
            Err(FilterError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn unsigned_rejects_plus_sign() {
        for kind in [FieldKind::U8, FieldKind::U16, FieldKind::U32, FieldKind::U64] {
            assert!(matches!(
                kind.coerce("n", "+5"),
                Err(FilterError::InvalidNumber { text, .. }) if text == "+5"
            ));
        }
        assert_eq!(FieldKind::I32.coerce("n", "+5").unwrap(), Value::I32(5));
    }

    #[test]
    fn coerce_text_is_identity() {
        assert_eq!(
            FieldKind::Text.coerce("t", " spaced text ").unwrap(),
            Value::from(" spaced text ")
        );
    }

    #[test]
    fn coerce_unsupported_kinds() {
        assert!(matches!(
            FieldKind::Bool.coerce("active", "true"),
            Err(FilterError::UnsupportedFieldType { kind, .. }) if kind == "bool"
        ));
        assert!(matches!(
            FieldKind::opaque("Blob").coerce("data", "x"),
            Err(FilterError::UnsupportedFieldType { kind, .. }) if kind == "Blob"
        ));
    }
}

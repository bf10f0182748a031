use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Ordering capability for custom field types.
///
/// Implementing this lets a type outside the built-in text/integer set take
/// part in `lt` and `gt` rules. Both methods compare against another value of
/// the same type.
pub trait OrderedValue {
    fn less_than(&self, other: &Self) -> bool;
    fn greater_than(&self, other: &Self) -> bool;
}

/// Object-safe view over a custom value. Implemented by the two wrappers
/// below; users never implement it directly.
trait DynCustom: fmt::Debug + fmt::Display + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
    fn dyn_eq(&self, other: &dyn Any) -> bool;
    fn is_ordered(&self) -> bool;
    fn dyn_less_than(&self, other: &dyn Any) -> Option<bool>;
    fn dyn_greater_than(&self, other: &dyn Any) -> Option<bool>;
}

struct Plain<T>(T);

struct Ordered<T>(T);

impl<T: fmt::Debug> fmt::Debug for Plain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl<T: fmt::Display> fmt::Display for Plain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<T: fmt::Debug> fmt::Debug for Ordered<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl<T: fmt::Display> fmt::Display for Ordered<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl<T> DynCustom for Plain<T>
where
    T: PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        &self.0
    }

    fn type_name(&self) -> &'static str {
        short_type_name::<T>()
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|o| self.0 == *o)
    }

    fn is_ordered(&self) -> bool {
        false
    }

    fn dyn_less_than(&self, _other: &dyn Any) -> Option<bool> {
        None
    }

    fn dyn_greater_than(&self, _other: &dyn Any) -> Option<bool> {
        None
    }
}

impl<T> DynCustom for Ordered<T>
where
    T: OrderedValue + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        &self.0
    }

    fn type_name(&self) -> &'static str {
        short_type_name::<T>()
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|o| self.0 == *o)
    }

    fn is_ordered(&self) -> bool {
        true
    }

    fn dyn_less_than(&self, other: &dyn Any) -> Option<bool> {
        other.downcast_ref::<T>().map(|o| self.0.less_than(o))
    }

    fn dyn_greater_than(&self, other: &dyn Any) -> Option<bool> {
        other.downcast_ref::<T>().map(|o| self.0.greater_than(o))
    }
}

/// Type name without the path of its outer type, e.g. `Version` for
/// `querysift::version::Version` and `Vec<u8>` for `alloc::vec::Vec<u8>`.
/// Generic arguments are kept as written.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let head = full.find('<').map_or(full, |i| &full[..i]);
    match head.rfind("::") {
        Some(i) => &full[i + 2..],
        None => full,
    }
}

/// A type-erased value of a custom field type.
///
/// Created with [`Value::custom`] (equality only) or [`Value::ordered`]
/// (equality and ordering). Cheap to clone.
#[derive(Clone)]
pub struct CustomValue(Arc<dyn DynCustom>);

impl CustomValue {
    /// Short name of the wrapped type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// Whether the wrapped value carries the [`OrderedValue`] capability.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.0.is_ordered()
    }

    /// Borrow the wrapped value as `T`, if that is its type.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Whether both values wrap the same concrete type.
    #[must_use]
    pub fn same_type(&self, other: &CustomValue) -> bool {
        self.inner_type_id() == other.inner_type_id()
    }

    /// `self < other`. `None` when the type is unordered or the types differ.
    #[must_use]
    pub fn less_than(&self, other: &CustomValue) -> Option<bool> {
        self.0.dyn_less_than(other.0.as_any())
    }

    /// `self > other`. `None` when the type is unordered or the types differ.
    #[must_use]
    pub fn greater_than(&self, other: &CustomValue) -> Option<bool> {
        self.0.dyn_greater_than(other.0.as_any())
    }

    fn inner_type_id(&self) -> TypeId {
        self.0.as_any().type_id()
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(other.0.as_any())
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.type_name(), self.0)
    }
}

impl fmt::Display for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A typed field value. The variant is the value's runtime type: two values
/// are comparable only when their variants (and, for [`Value::Custom`], their
/// wrapped types) agree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A UTF-8 string.
    Text(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    /// A boolean. Only usable with equality.
    Bool(bool),
    /// A value of a custom field type.
    Custom(CustomValue),
}

impl Value {
    /// Wrap a custom value that only supports equality.
    pub fn custom<T>(value: T) -> Self
    where
        T: PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static,
    {
        Value::Custom(CustomValue(Arc::new(Plain(value))))
    }

    /// Wrap a custom value that supports equality and ordering.
    pub fn ordered<T>(value: T) -> Self
    where
        T: OrderedValue + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static,
    {
        Value::Custom(CustomValue(Arc::new(Ordered(value))))
    }

    /// Name of this value's runtime type, used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "string",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::Bool(_) => "bool",
            Value::Custom(c) => c.type_name(),
        }
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Value::I8(_)
                | Value::I16(_)
                | Value::I32(_)
                | Value::I64(_)
                | Value::U8(_)
                | Value::U16(_)
                | Value::U32(_)
                | Value::U64(_)
        )
    }

    /// Whether this value can be used with `lt`/`gt`: integers, and custom
    /// values carrying the [`OrderedValue`] capability.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        match self {
            Value::Custom(c) => c.is_ordered(),
            other => other.is_integer(),
        }
    }

    /// Whether both values have the same runtime type.
    #[must_use]
    pub fn same_type(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Custom(a), Value::Custom(b)) => a.same_type(b),
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }

    /// Native ordering between two integers of the same width.
    /// Returns `None` for any other pair.
    pub(crate) fn cmp_integer(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::I8(a), Value::I8(b)) => Some(a.cmp(b)),
            (Value::I16(a), Value::I16(b)) => Some(a.cmp(b)),
            (Value::I32(a), Value::I32(b)) => Some(a.cmp(b)),
            (Value::I64(a), Value::I64(b)) => Some(a.cmp(b)),
            (Value::U8(a), Value::U8(b)) => Some(a.cmp(b)),
            (Value::U16(a), Value::U16(b)) => Some(a.cmp(b)),
            (Value::U32(a), Value::U32(b)) => Some(a.cmp(b)),
            (Value::U64(a), Value::U64(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Borrow the text of a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::I8(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::I16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(v) => write!(f, "{v}"),
            Value::I8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Custom(v) => write!(f, "{v}"),
        }
    }
}

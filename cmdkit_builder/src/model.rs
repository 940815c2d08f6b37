use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The logical kind of value an argument represents, independent of its textual representation.
///
/// Semantic types are compared by name.
/// The built-in types are available as associated constants; host applications create their own via [`SemanticType::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SemanticType(Cow<'static, str>);

impl SemanticType {
    /// Free-form text.
    pub const TEXT: SemanticType = SemanticType(Cow::Borrowed("text"));
    /// Any number; the parent of [`SemanticType::INTEGER`] and [`SemanticType::FLOAT`].
    pub const NUMERIC: SemanticType = SemanticType(Cow::Borrowed("numeric"));
    /// A signed 64 bit integer.
    pub const INTEGER: SemanticType = SemanticType(Cow::Borrowed("integer"));
    /// A 64 bit floating point number.
    pub const FLOAT: SemanticType = SemanticType(Cow::Borrowed("float"));
    /// A truth value.
    pub const BOOLEAN: SemanticType = SemanticType(Cow::Borrowed("boolean"));
    /// A file system path.
    pub const PATH: SemanticType = SemanticType(Cow::Borrowed("path"));

    /// Create a semantic type.
    ///
    /// ### Example
    /// ```
    /// # use cmdkit_builder as cmdkit;
    /// use cmdkit::SemanticType;
    ///
    /// let port = SemanticType::new("port");
    /// assert_eq!(port.name(), "port");
    /// assert_eq!(SemanticType::new("integer"), SemanticType::INTEGER);
    /// ```
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The name of this semantic type.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A typed value produced by coercing a raw token.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text, also the outcome of an un-coerced token.
    Text(String),
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A truth value.
    Boolean(bool),
    /// A file system path.
    Path(PathBuf),
    /// The values of a repeating argument, in token order.
    List(Vec<Value>),
}

impl Value {
    /// The text, if this is a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// The integer, if this is a [`Value::Integer`].
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(integer) => Some(*integer),
            _ => None,
        }
    }

    /// The float, if this is a [`Value::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(float) => Some(*float),
            _ => None,
        }
    }

    /// The boolean, if this is a [`Value::Boolean`].
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(boolean) => Some(*boolean),
            _ => None,
        }
    }

    /// The path, if this is a [`Value::Path`].
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Value::Path(path) => Some(path.as_path()),
            _ => None,
        }
    }

    /// The values, if this is a [`Value::List`].
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values.as_slice()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{text}"),
            Value::Integer(integer) => write!(f, "{integer}"),
            Value::Float(float) => write!(f, "{float}"),
            Value::Boolean(boolean) => write!(f, "{boolean}"),
            Value::Path(path) => write!(f, "{}", path.display()),
            Value::List(values) => write!(
                f,
                "{}",
                values
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<String>>()
                    .join(" ")
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<PathBuf> for Value {
    fn from(value: PathBuf) -> Self {
        Value::Path(value)
    }
}

/// A zero-argument function producing a default value on demand.
pub type Producer = Arc<dyn Fn() -> Value + Send + Sync>;

/// The default of a value slot: either a literal, or lazily produced at the point it is needed.
#[derive(Clone)]
pub enum DefaultValue {
    /// A fixed value.
    Literal(Value),
    /// Re-evaluated on every [`DefaultValue::resolve`] (ex: "the current time").
    Lazy(Producer),
}

impl DefaultValue {
    /// Create a lazy default.
    pub fn lazy(producer: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        DefaultValue::Lazy(Arc::new(producer))
    }

    /// Produce the default value.
    pub fn resolve(&self) -> Value {
        match self {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Lazy(producer) => producer(),
        }
    }

    /// The literal value, if this default is not lazy.
    pub fn literal(&self) -> Option<&Value> {
        match self {
            DefaultValue::Literal(value) => Some(value),
            DefaultValue::Lazy(_) => None,
        }
    }
}

impl std::fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefaultValue::Literal(value) => write!(f, "Literal({value:?})"),
            DefaultValue::Lazy(_) => write!(f, "Lazy(..)"),
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        DefaultValue::Literal(value)
    }
}

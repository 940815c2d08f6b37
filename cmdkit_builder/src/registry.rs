use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{CoercionError, RegistryError};
use crate::model::{SemanticType, Value};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Converts a raw token (already accepted by the recognition pattern) into a [`Value`].
/// The `Err` message explains why the token was rejected.
pub type Converter = Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

/// The (recognition pattern, converter) pair registered for a semantic type.
#[derive(Clone)]
pub struct Coercion {
    pattern: Option<Regex>,
    converter: Converter,
}

impl Coercion {
    /// Create a coercion which accepts any token, leaving all validation to the `converter`.
    ///
    /// ### Example
    /// ```
    /// # use cmdkit_builder as cmdkit;
    /// use cmdkit::{Coercion, SemanticType, Value};
    ///
    /// let shout = Coercion::new(|token| Ok(Value::Text(token.to_uppercase())));
    /// assert_eq!(
    ///     shout.coerce(&SemanticType::TEXT, "ok").unwrap(),
    ///     Value::Text("OK".to_string())
    /// );
    /// ```
    pub fn new(converter: impl Fn(&str) -> Result<Value, String> + Send + Sync + 'static) -> Self {
        Self {
            pattern: None,
            converter: Arc::new(converter),
        }
    }

    /// Restrict the tokens accepted by this coercion to those matching `pattern`.
    /// The pattern is matched with [`Regex::is_match`], so anchor it (`^..$`) to constrain the whole token.
    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Create an enumerated-choice coercion, accepting exactly the listed variants as [`Value::Text`].
    ///
    /// ### Example
    /// ```
    /// # use cmdkit_builder as cmdkit;
    /// use cmdkit::{Coercion, SemanticType};
    ///
    /// let colour = SemanticType::new("colour");
    /// let coercion = Coercion::choices(["red", "green"]);
    /// assert!(coercion.coerce(&colour, "red").is_ok());
    /// assert!(coercion.coerce(&colour, "blue").is_err());
    /// ```
    pub fn choices<S: Into<String>>(variants: impl IntoIterator<Item = S>) -> Self {
        let variants: Vec<String> = variants.into_iter().map(|v| v.into()).collect();
        let message = format!("expected one of {{{}}}", variants.join(", "));

        Self::new(move |token| {
            if variants.iter().any(|v| v == token) {
                Ok(Value::Text(token.to_string()))
            } else {
                Err(message.clone())
            }
        })
    }

    /// The recognition pattern, if any.
    pub fn recognition_pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// The converter.
    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    /// Coerce a raw token: first check the recognition pattern, then run the converter.
    /// The `semantic_type` is only used to describe a failure.
    pub fn coerce(&self, semantic_type: &SemanticType, token: &str) -> Result<Value, CoercionError> {
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(token) {
                return Err(CoercionError::Mismatch {
                    token: token.to_string(),
                    semantic_type: semantic_type.clone(),
                });
            }
        }

        (self.converter)(token).map_err(|message| CoercionError::InvalidConversion {
            token: token.to_string(),
            semantic_type: semantic_type.clone(),
            message,
        })
    }
}

impl std::fmt::Debug for Coercion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.pattern {
            Some(pattern) => write!(f, "Coercion[/{}/]", pattern.as_str()),
            None => write!(f, "Coercion[*]"),
        }
    }
}

/// The table mapping semantic types to their [`Coercion`], along with the "type implies type" hierarchy used to fall back on a more general type.
///
/// The registry is an explicit object; build it (or extend [`TypeRegistry::default`]) before building the arguments which reference it.
/// Arguments take a snapshot of their coercion at build time, so changes made afterwards do not affect them.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    coercions: HashMap<SemanticType, Coercion>,
    parents: HashMap<SemanticType, SemanticType>,
}

const TEXT_PATTERN: &str = r"(?s)^.*$";
const PATH_PATTERN: &str = r"(?s)^.+$";
// Decimal, or a `0x`/`0b`/`0o` radix prefix; a bare leading `0` means octal (`010` is 8).
const INTEGER_PATTERN: &str = r"(?i)^[+-]?(?:0x[0-9a-f](?:_?[0-9a-f])*|0b[01](?:_?[01])*|0o?[0-7](?:_?[0-7])*|0|[1-9](?:_?[0-9])*)$";
const FLOAT_PATTERN: &str =
    r"^[+-]?(?:[0-9](?:_?[0-9])*(?:\.(?:[0-9](?:_?[0-9])*)?)?|\.[0-9](?:_?[0-9])*)(?:[eE][+-]?[0-9]+)?$";
const BOOLEAN_PATTERN: &str = r"(?i)^(?:true|yes|\+|false|no|-|nil)$";

impl Default for TypeRegistry {
    /// A registry holding the built-in coercions:
    /// `text`, `numeric` (parent of `integer` and `float`), `integer`, `float`, `boolean` and `path`.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(
            SemanticType::TEXT,
            Coercion::new(|token| Ok(Value::Text(token.to_string()))).pattern(builtin(TEXT_PATTERN)),
        );
        registry.register(
            SemanticType::NUMERIC,
            Coercion::new(|token| convert_integer(token).or_else(|_| convert_float(token)))
                .pattern(builtin(&format!("(?:{INTEGER_PATTERN})|(?:{FLOAT_PATTERN})"))),
        );
        registry.register(
            SemanticType::INTEGER,
            Coercion::new(convert_integer).pattern(builtin(INTEGER_PATTERN)),
        );
        registry.register(
            SemanticType::FLOAT,
            Coercion::new(convert_float).pattern(builtin(FLOAT_PATTERN)),
        );
        registry.register(
            SemanticType::BOOLEAN,
            Coercion::new(convert_boolean).pattern(builtin(BOOLEAN_PATTERN)),
        );
        registry.register(
            SemanticType::PATH,
            Coercion::new(|token| Ok(Value::Path(PathBuf::from(token))))
                .pattern(builtin(PATH_PATTERN)),
        );
        registry
            .parents
            .insert(SemanticType::INTEGER, SemanticType::NUMERIC);
        registry
            .parents
            .insert(SemanticType::FLOAT, SemanticType::NUMERIC);
        registry
    }
}

impl TypeRegistry {
    /// A registry with no coercions and no type hierarchy.
    pub fn empty() -> Self {
        Self {
            coercions: HashMap::default(),
            parents: HashMap::default(),
        }
    }

    /// Register (or replace) the coercion for a semantic type.
    pub fn register(&mut self, semantic_type: SemanticType, coercion: Coercion) -> &mut Self {
        self.coercions.insert(semantic_type, coercion);
        self
    }

    /// Declare `parent` as the more general type of `child`.
    /// Lookups for `child` which find no direct registration fall back to `parent` (and its ancestors).
    /// Re-declaring replaces the previous parent.
    ///
    /// ### Example
    /// ```
    /// # use cmdkit_builder as cmdkit;
    /// use cmdkit::{SemanticType, TypeRegistry};
    ///
    /// let mut registry = TypeRegistry::default();
    /// let port = SemanticType::new("port");
    /// registry.declare(port.clone(), SemanticType::INTEGER).unwrap();
    /// assert!(registry.lookup(&port).is_some());
    /// assert!(registry.declare(SemanticType::NUMERIC, port).is_err());
    /// ```
    pub fn declare(
        &mut self,
        child: SemanticType,
        parent: SemanticType,
    ) -> Result<&mut Self, RegistryError> {
        if parent == child || self.ancestors(&parent).any(|a| a == &child) {
            return Err(RegistryError::Cycle { child, parent });
        }

        self.parents.insert(child, parent);
        Ok(self)
    }

    /// The declared parent of a semantic type.
    pub fn parent(&self, semantic_type: &SemanticType) -> Option<&SemanticType> {
        self.parents.get(semantic_type)
    }

    /// The ancestors of a semantic type, nearest first (the type itself is not included).
    pub fn ancestors<'r>(&'r self, semantic_type: &SemanticType) -> Ancestors<'r> {
        Ancestors {
            parents: &self.parents,
            current: self.parents.get(semantic_type),
            visited: HashSet::default(),
        }
    }

    /// Resolve the coercion for a semantic type.
    ///
    /// A direct registration wins; otherwise the nearest registered ancestor's coercion applies.
    /// If neither exists the result is `None`, meaning "no coercion" (tokens pass through as text).
    pub fn lookup(&self, semantic_type: &SemanticType) -> Option<Coercion> {
        if let Some(coercion) = self.coercions.get(semantic_type) {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Resolved {semantic_type} directly: {coercion:?}.");
            }

            return Some(coercion.clone());
        }

        for ancestor in self.ancestors(semantic_type) {
            if let Some(coercion) = self.coercions.get(ancestor) {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Resolved {semantic_type} via ancestor {ancestor}: {coercion:?}.");
                }

                return Some(coercion.clone());
            }
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("No coercion for {semantic_type}; tokens will pass through.");
        }

        None
    }
}

/// Iterator over the ancestors of a semantic type, see [`TypeRegistry::ancestors`].
pub struct Ancestors<'r> {
    parents: &'r HashMap<SemanticType, SemanticType>,
    current: Option<&'r SemanticType>,
    visited: HashSet<&'r SemanticType>,
}

impl<'r> Iterator for Ancestors<'r> {
    type Item = &'r SemanticType;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;

        // `declare` prevents cycles, but stop rather than spin if one ever appears.
        if !self.visited.insert(current) {
            return None;
        }

        self.current = self.parents.get(current);
        Some(current)
    }
}

fn builtin(pattern: &str) -> Regex {
    Regex::new(pattern).expect("internal error - built-in pattern must compile")
}

fn convert_integer(token: &str) -> Result<Value, String> {
    let digits = token.replace('_', "").to_ascii_lowercase();
    let (sign, unsigned) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits.strip_prefix('+').unwrap_or(digits.as_str())),
    };

    let (radix, magnitude) = if let Some(rest) = unsigned.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = unsigned.strip_prefix("0b") {
        (2, rest)
    } else if let Some(rest) = unsigned.strip_prefix("0o") {
        (8, rest)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    // The sign stays attached so that `i64::MIN` is reachable.
    i64::from_str_radix(&format!("{sign}{magnitude}"), radix)
        .map(Value::Integer)
        .map_err(|error| error.to_string())
}

fn convert_float(token: &str) -> Result<Value, String> {
    token
        .replace('_', "")
        .parse::<f64>()
        .map(Value::Float)
        .map_err(|error| error.to_string())
}

fn convert_boolean(token: &str) -> Result<Value, String> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "yes" | "+" => Ok(Value::Boolean(true)),
        "false" | "no" | "-" | "nil" => Ok(Value::Boolean(false)),
        _ => Err("expected a boolean".to_string()),
    }
}

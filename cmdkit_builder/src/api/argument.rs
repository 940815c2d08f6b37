use regex::Regex;
use std::sync::Arc;

use crate::api::error::{ParseError, SpecificationError, TransformError};
use crate::api::value::ValueSpec;
use crate::constant::*;
use crate::model::{DefaultValue, SemanticType, Value};
use crate::prelude::Usage;
use crate::registry::{Coercion, Converter, TypeRegistry};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Post-processing applied to a value after coercion.
/// The `Err` message explains why the value was rejected.
pub type Transform = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

/// A positional argument of a command.
///
/// Built via [`Argument::builder`].
/// The coercion (recognition pattern + converter) for the argument's semantic type is resolved once, when the argument is built.
#[derive(Clone)]
pub struct Argument {
    value: ValueSpec,
    name: String,
    description: String,
    repeats: bool,
    coercion: Option<Coercion>,
    transform: Option<Transform>,
}

impl Argument {
    /// Start building an argument.
    ///
    /// ### Example
    /// ```
    /// # use cmdkit_builder as cmdkit;
    /// use cmdkit::{prelude::*, Argument, SemanticType, TypeRegistry, Value};
    ///
    /// let registry = TypeRegistry::default();
    /// let count = Argument::builder("count")
    ///     .semantic_type(SemanticType::INTEGER)
    ///     .description("How many times to repeat.")
    ///     .build(&registry)
    ///     .unwrap();
    ///
    /// assert_eq!(count.usage(), "[COUNT]");
    /// assert_eq!(count.parse("3").unwrap(), Value::Integer(3));
    /// ```
    pub fn builder(name: impl Into<String>) -> ArgumentBuilder {
        ArgumentBuilder::new(name)
    }

    /// The argument name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The help description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the argument consumes all remaining tokens, rather than exactly one.
    pub fn repeats(&self) -> bool {
        self.repeats
    }

    /// The underlying value specification.
    pub fn value(&self) -> &ValueSpec {
        &self.value
    }

    /// The semantic type of the argument.
    pub fn semantic_type(&self) -> &SemanticType {
        self.value.semantic_type()
    }

    /// The name shown in usage text.
    pub fn display_name(&self) -> &str {
        self.value.display_name()
    }

    /// The default, if any.
    pub fn default(&self) -> Option<&DefaultValue> {
        self.value.default()
    }

    /// Whether the argument is required.
    pub fn required(&self) -> bool {
        self.value.required()
    }

    /// Whether the argument is optional (`!required`).
    pub fn optional(&self) -> bool {
        self.value.optional()
    }

    /// The coercion resolved for the semantic type, if any.
    pub fn coercion(&self) -> Option<&Coercion> {
        self.coercion.as_ref()
    }

    /// The recognition pattern resolved for the semantic type, if any.
    pub fn pattern(&self) -> Option<&Regex> {
        self.coercion
            .as_ref()
            .and_then(|coercion| coercion.recognition_pattern())
    }

    /// The converter resolved for the semantic type, if any.
    pub fn converter(&self) -> Option<&Converter> {
        self.coercion.as_ref().map(|coercion| coercion.converter())
    }

    /// Parse a raw token: coerce it by the resolved coercion (if any), then apply the transform (if any).
    ///
    /// Without a coercion the token passes through as [`Value::Text`].
    /// No default is substituted here; `parse` is only meaningful when a token exists.
    pub fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        let value = match &self.coercion {
            Some(coercion) => coercion.coerce(self.value.semantic_type(), raw)?,
            None => Value::Text(raw.to_string()),
        };

        match &self.transform {
            Some(transform) => transform(value).map_err(|message| {
                ParseError::from(TransformError {
                    name: self.name.clone(),
                    message,
                })
            }),
            None => Ok(value),
        }
    }
}

impl Usage for Argument {
    /// The display name, followed by `" ..."` when repeating, all wrapped in `[..]` when optional.
    fn usage(&self) -> String {
        let mut usage = self.value.usage();

        if self.repeats {
            usage.push_str(REPEAT_MARKER);
        }

        if self.optional() {
            usage = format!("{OPTIONAL_OPEN}{usage}{OPTIONAL_CLOSE}");
        }

        usage
    }
}

impl std::fmt::Debug for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let coercion = match &self.coercion {
            Some(c) => format!("{c:?}"),
            None => "-".to_string(),
        };
        let transform = if self.transform.is_some() { ", transform" } else { "" };

        write!(
            f,
            "Arg[{t}, {coercion}, {name}, {usage}{transform}, {d}]",
            t = self.value.semantic_type(),
            name = self.name,
            usage = self.usage(),
            d = self.description,
        )
    }
}

/// Builder for an [`Argument`].
pub struct ArgumentBuilder {
    name: String,
    semantic_type: SemanticType,
    display_name: Option<String>,
    default: Option<DefaultValue>,
    required: bool,
    repeats: bool,
    description: Option<String>,
    transform: Option<Transform>,
}

impl ArgumentBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            semantic_type: SemanticType::TEXT,
            display_name: None,
            default: None,
            required: false,
            repeats: false,
            description: None,
            transform: None,
        }
    }

    /// Set the semantic type (default: [`SemanticType::TEXT`]).
    pub fn semantic_type(mut self, semantic_type: SemanticType) -> Self {
        self.semantic_type = semantic_type;
        self
    }

    /// Set the name shown in usage text (default: the upper-cased argument name).
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Set a literal default.
    /// If repeated, only the final default applies.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Set a lazily produced default, evaluated each time the default is needed (ex: "the current time").
    /// If repeated, only the final default applies.
    pub fn default_with(mut self, producer: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = Some(DefaultValue::lazy(producer));
        self
    }

    /// Mark the argument as required (default: optional).
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark the argument as consuming all remaining tokens.
    pub fn repeats(mut self) -> Self {
        self.repeats = true;
        self
    }

    /// Document the argument.
    /// Every argument must be described.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the post-processing applied after coercion.
    ///
    /// ### Example
    /// ```
    /// # use cmdkit_builder as cmdkit;
    /// use cmdkit::{Argument, SemanticType, TypeRegistry, Value};
    ///
    /// let port = Argument::builder("port")
    ///     .semantic_type(SemanticType::INTEGER)
    ///     .description("The port to listen on.")
    ///     .transform(|value| match value {
    ///         Value::Integer(p) if p > 0 && p < 65536 => Ok(value),
    ///         _ => Err("must be within 1..65535".to_string()),
    ///     })
    ///     .build(&TypeRegistry::default())
    ///     .unwrap();
    ///
    /// assert!(port.parse("8080").is_ok());
    /// assert!(port.parse("0").is_err());
    /// ```
    pub fn transform(
        mut self,
        transform: impl Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Build the argument, resolving its coercion from `registry`.
    ///
    /// An unregistered semantic type (with no registered ancestor) is not an error; the argument simply performs no coercion.
    pub fn build(self, registry: &TypeRegistry) -> Result<Argument, SpecificationError> {
        let ArgumentBuilder {
            name,
            semantic_type,
            display_name,
            default,
            required,
            repeats,
            description,
            transform,
        } = self;

        let description = match description {
            Some(description) => description,
            None => return Err(SpecificationError::MissingDescription { name }),
        };

        if name.is_empty() {
            return Err(SpecificationError::EmptyName);
        }

        if required && default.is_some() {
            return Err(SpecificationError::RequiredWithDefault { name });
        }

        let coercion = registry.lookup(&semantic_type);
        let display_name = display_name.unwrap_or_else(|| name.to_uppercase());
        let mut value = ValueSpec::new(semantic_type)
            .with_display_name(display_name)
            .with_required(required);

        if let Some(default) = default {
            value = value.with_default_value(default);
        }

        let argument = Argument {
            value,
            name,
            description,
            repeats,
            coercion,
            transform,
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Built {argument:?}.");
        }

        Ok(argument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::CoercionError;
    use rand::distributions::Alphanumeric;
    use rand::{thread_rng, Rng};
    use rstest::rstest;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn registry() -> TypeRegistry {
        TypeRegistry::default()
    }

    fn random_display_name() -> String {
        let length = thread_rng().gen_range(1..12);
        thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    }

    #[test]
    fn argument() {
        let argument = Argument::builder("file")
            .description("The file to read.")
            .build(&registry())
            .unwrap();

        assert_eq!(argument.name(), "file");
        assert_eq!(argument.description(), "The file to read.");
        assert_eq!(argument.semantic_type(), &SemanticType::TEXT);
        assert_eq!(argument.display_name(), "FILE");
        assert_matches!(argument.default(), None);
        assert!(!argument.required());
        assert!(argument.optional());
        assert!(!argument.repeats());
        assert!(argument.coercion().is_some());
        assert!(argument.pattern().is_some());
        assert!(argument.converter().is_some());
        assert_eq!(argument.value().usage(), "FILE");
    }

    #[test]
    fn argument_display_name() {
        let argument = Argument::builder("input-file")
            .display_name("IN")
            .description("d")
            .build(&registry())
            .unwrap();
        assert_eq!(argument.display_name(), "IN");

        let argument = Argument::builder("input-file")
            .description("d")
            .build(&registry())
            .unwrap();
        assert_eq!(argument.display_name(), "INPUT-FILE");
    }

    #[rstest]
    #[case(false, true, "NAME")]
    #[case(true, true, "NAME ...")]
    #[case(false, false, "[NAME]")]
    #[case(true, false, "[NAME ...]")]
    fn usage(#[case] repeats: bool, #[case] required: bool, #[case] expected: &str) {
        let mut builder = Argument::builder("name").description("d");

        if repeats {
            builder = builder.repeats();
        }

        if required {
            builder = builder.required();
        }

        let argument = builder.build(&registry()).unwrap();
        assert_eq!(argument.usage(), expected);
    }

    #[rstest]
    #[case(false, true)]
    #[case(true, true)]
    #[case(false, false)]
    #[case(true, false)]
    fn usage_shape(#[case] repeats: bool, #[case] required: bool) {
        for _ in 0..100 {
            let display_name = random_display_name();
            let mut builder = Argument::builder("name")
                .display_name(display_name.clone())
                .description("d");

            if repeats {
                builder = builder.repeats();
            }

            if required {
                builder = builder.required();
            }

            let argument = builder.build(&registry()).unwrap();
            let expected = match (repeats, required) {
                (false, true) => display_name.clone(),
                (true, true) => format!("{display_name} ..."),
                (false, false) => format!("[{display_name}]"),
                (true, false) => format!("[{display_name} ...]"),
            };
            assert_eq!(argument.usage(), expected);
        }
    }

    #[test]
    fn missing_description() {
        let semantic_types = vec![
            SemanticType::TEXT,
            SemanticType::INTEGER,
            SemanticType::new("unregistered"),
        ];

        for semantic_type in semantic_types {
            for mask in 0..32u8 {
                let mut builder = Argument::builder(if mask & 1 == 0 { "name" } else { "" })
                    .semantic_type(semantic_type.clone());

                if mask & 2 != 0 {
                    builder = builder.required();
                }

                if mask & 4 != 0 {
                    builder = builder.repeats();
                }

                if mask & 8 != 0 {
                    builder = builder.default(Value::from("x"));
                }

                if mask & 16 != 0 {
                    builder = builder
                        .display_name("DISPLAY")
                        .transform(|value| Ok(value));
                }

                assert_matches!(
                    builder.build(&registry()),
                    Err(SpecificationError::MissingDescription { .. })
                );
            }
        }
    }

    #[test]
    fn empty_name() {
        assert_matches!(
            Argument::builder("").description("d").build(&registry()),
            Err(SpecificationError::EmptyName)
        );
    }

    #[test]
    fn required_with_default() {
        assert_matches!(
            Argument::builder("name")
                .description("d")
                .default(Value::from("x"))
                .required()
                .build(&registry()),
            Err(SpecificationError::RequiredWithDefault { name }) if name == "name"
        );
        assert_matches!(
            Argument::builder("name")
                .description("d")
                .required()
                .default_with(|| Value::from("x"))
                .build(&registry()),
            Err(SpecificationError::RequiredWithDefault { .. })
        );
    }

    #[test]
    fn defaults() {
        let argument = Argument::builder("count")
            .semantic_type(SemanticType::INTEGER)
            .default(Value::Integer(3))
            .description("d")
            .build(&registry())
            .unwrap();
        assert_eq!(
            argument.default().map(DefaultValue::resolve),
            Some(Value::Integer(3))
        );

        let argument = Argument::builder("stamp")
            .default_with(|| Value::from("later"))
            .description("d")
            .build(&registry())
            .unwrap();
        assert_matches!(argument.default(), Some(DefaultValue::Lazy(_)));
        assert_eq!(
            argument.default().map(DefaultValue::resolve),
            Some(Value::from("later"))
        );
    }

    #[test]
    fn default_with_deferred() {
        let counter = Arc::new(AtomicI64::new(0));
        let captured = counter.clone();
        let argument = Argument::builder("stamp")
            .default_with(move || Value::Integer(captured.fetch_add(1, Ordering::SeqCst)))
            .description("d")
            .build(&registry())
            .unwrap();

        // Only resolving produces the default.
        let copy = argument.clone();
        let _ = format!("{argument:?} {}", copy.usage());
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        assert_eq!(
            argument.default().map(DefaultValue::resolve),
            Some(Value::Integer(0))
        );
        assert_eq!(
            copy.default().map(DefaultValue::resolve),
            Some(Value::Integer(1))
        );
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn parse_converter_then_transform() {
        let shout = SemanticType::new("shout");
        let mut registry = TypeRegistry::empty();
        registry.register(
            shout.clone(),
            Coercion::new(|token| Ok(Value::Text(token.to_uppercase()))),
        );

        let argument = Argument::builder("greeting")
            .semantic_type(shout)
            .description("d")
            .transform(|value| match value {
                Value::Text(text) => Ok(Value::Text(format!("{text}!"))),
                other => Ok(other),
            })
            .build(&registry)
            .unwrap();

        assert_eq!(argument.parse("ok").unwrap(), Value::from("OK!"));
    }

    #[rstest]
    #[case(SemanticType::INTEGER, "12", Value::Integer(12))]
    #[case(SemanticType::FLOAT, "1.25", Value::Float(1.25))]
    #[case(SemanticType::BOOLEAN, "yes", Value::Boolean(true))]
    #[case(SemanticType::TEXT, "hello", Value::from("hello"))]
    #[case(SemanticType::TEXT, "", Value::from(""))]
    #[case(SemanticType::INTEGER, "0x1F", Value::Integer(31))]
    fn parse_builtin(
        #[case] semantic_type: SemanticType,
        #[case] raw: &str,
        #[case] expected: Value,
    ) {
        let argument = Argument::builder("name")
            .semantic_type(semantic_type)
            .description("d")
            .build(&registry())
            .unwrap();
        assert_eq!(argument.parse(raw).unwrap(), expected);
    }

    #[test]
    fn parse_coercion_error() {
        let argument = Argument::builder("count")
            .semantic_type(SemanticType::INTEGER)
            .description("d")
            .transform(|_| panic!("transform must not run"))
            .build(&registry())
            .unwrap();

        assert_matches!(
            argument.parse("abc"),
            Err(ParseError::Coercion(CoercionError::Mismatch { token, semantic_type })) => {
                assert_eq!(token, "abc");
                assert_eq!(semantic_type, SemanticType::INTEGER);
            }
        );
    }

    #[test]
    fn parse_coercion_error_names_own_type() {
        let mut registry = registry();
        let port = SemanticType::new("port");
        registry.declare(port.clone(), SemanticType::INTEGER).unwrap();
        let argument = Argument::builder("port")
            .semantic_type(port.clone())
            .description("d")
            .build(&registry)
            .unwrap();

        assert_eq!(argument.parse("80").unwrap(), Value::Integer(80));
        assert_matches!(
            argument.parse("http"),
            Err(ParseError::Coercion(CoercionError::Mismatch { semantic_type, .. })) if semantic_type == port
        );
    }

    #[test]
    fn parse_transform_error() {
        let argument = Argument::builder("port")
            .semantic_type(SemanticType::INTEGER)
            .description("d")
            .transform(|_| Err("out of range".to_string()))
            .build(&registry())
            .unwrap();

        assert_eq!(
            argument.parse("0").unwrap_err(),
            ParseError::Transform(TransformError {
                name: "port".to_string(),
                message: "out of range".to_string(),
            })
        );
    }

    #[test]
    fn parse_unregistered() {
        let argument = Argument::builder("thing")
            .semantic_type(SemanticType::new("unregistered"))
            .description("d")
            .build(&registry())
            .unwrap();

        assert!(argument.coercion().is_none());
        assert!(argument.pattern().is_none());
        assert!(argument.converter().is_none());
        assert_eq!(argument.parse("").unwrap(), Value::from(""));
        assert_eq!(argument.parse("a b c").unwrap(), Value::from("a b c"));
    }

    #[test]
    fn ancestor_fallback() {
        let numeric = SemanticType::new("numeric");
        let count = SemanticType::new("count");
        let mut registry = TypeRegistry::empty();
        registry.register(
            numeric.clone(),
            Coercion::new(|token| {
                token
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|e| e.to_string())
            }),
        );
        registry.declare(count.clone(), numeric).unwrap();

        let argument = Argument::builder("n")
            .semantic_type(count)
            .description("d")
            .build(&registry)
            .unwrap();

        assert!(argument.converter().is_some());
        assert_eq!(argument.parse("7").unwrap(), Value::Integer(7));
    }

    #[test]
    fn coercion_snapshot() {
        let mut registry = TypeRegistry::empty();
        let shout = SemanticType::new("shout");
        let argument = Argument::builder("greeting")
            .semantic_type(shout.clone())
            .description("d")
            .build(&registry)
            .unwrap();

        registry.register(
            shout,
            Coercion::new(|token| Ok(Value::Text(token.to_uppercase()))),
        );

        // Registered after the build, so the argument still passes through.
        assert!(argument.coercion().is_none());
        assert_eq!(argument.parse("ok").unwrap(), Value::from("ok"));
    }

    #[test]
    fn idempotent() {
        let argument = Argument::builder("values")
            .semantic_type(SemanticType::INTEGER)
            .repeats()
            .description("d")
            .transform(|value| match value {
                Value::Integer(i) => Ok(Value::Integer(i * 2)),
                other => Ok(other),
            })
            .build(&registry())
            .unwrap();

        for _ in 0..100 {
            let raw: i32 = thread_rng().gen();
            let raw = raw.to_string();
            let first = argument.parse(&raw);
            assert_eq!(argument.parse(&raw), first);
            assert_eq!(argument.usage(), "[VALUES ...]");
        }
    }

    #[test]
    fn debug() {
        let argument = Argument::builder("file")
            .semantic_type(SemanticType::new("unregistered"))
            .required()
            .description("The file.")
            .build(&registry())
            .unwrap();
        assert_eq!(
            format!("{argument:?}"),
            "Arg[unregistered, -, file, FILE, The file.]"
        );
    }
}

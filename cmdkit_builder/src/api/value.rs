use crate::model::{DefaultValue, SemanticType, Value};
use crate::prelude::Usage;

/// The specification of a single value slot: its semantic type, display name, default and requiredness.
///
/// Immutable once built (each setter consumes `self`).
#[derive(Debug, Clone)]
pub struct ValueSpec {
    semantic_type: SemanticType,
    display_name: String,
    default: Option<DefaultValue>,
    required: bool,
}

impl ValueSpec {
    /// Create an optional value specification without a default.
    /// The display name defaults to the upper-cased semantic type name.
    ///
    /// ### Example
    /// ```
    /// # use cmdkit_builder as cmdkit;
    /// use cmdkit::{prelude::*, SemanticType, ValueSpec};
    ///
    /// let value = ValueSpec::new(SemanticType::INTEGER);
    /// assert_eq!(value.usage(), "INTEGER");
    /// assert!(value.optional());
    /// ```
    pub fn new(semantic_type: SemanticType) -> Self {
        let display_name = semantic_type.name().to_uppercase();
        Self {
            semantic_type,
            display_name,
            default: None,
            required: false,
        }
    }

    /// Set the name shown in usage text.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set a literal default.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Set a lazily produced default, evaluated each time the default is needed.
    pub fn with_default_fn(mut self, producer: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = Some(DefaultValue::lazy(producer));
        self
    }

    /// Set the default from an existing [`DefaultValue`].
    pub fn with_default_value(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Mark the value as required (or not).
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// The semantic type of the value.
    pub fn semantic_type(&self) -> &SemanticType {
        &self.semantic_type
    }

    /// The name shown in usage text.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The default, if any.
    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// Whether the value is required.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Whether the value is optional (`!required`).
    pub fn optional(&self) -> bool {
        !self.required
    }
}

impl Usage for ValueSpec {
    fn usage(&self) -> String {
        self.display_name.clone()
    }
}

use thiserror::Error;

use crate::model::SemanticType;

/// An invalid argument specification, detected when the command is defined.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecificationError {
    /// The argument was built without a description.
    #[error("argument '{name}' is missing a description.")]
    MissingDescription {
        /// The argument name.
        name: String,
    },

    /// The argument was built with an empty name.
    #[error("argument name must not be empty.")]
    EmptyName,

    /// The argument is both required and carries a default.
    #[error("argument '{name}' cannot be both required and have a default.")]
    RequiredWithDefault {
        /// The argument name.
        name: String,
    },

    /// Two arguments of the same command share a name.
    #[error("argument '{name}' is already defined.")]
    DuplicateName {
        /// The argument name.
        name: String,
    },

    /// An argument was declared after a repeating argument.
    #[error("argument '{name}' cannot follow a repeating argument.")]
    RepeatsNotLast {
        /// The name of the argument following the repeating one.
        name: String,
    },
}

/// An invalid change to the semantic type hierarchy of a [`TypeRegistry`](crate::TypeRegistry).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Declaring the parent would make the type its own ancestor.
    #[error("declaring {parent} as the parent of {child} creates a cycle.")]
    Cycle {
        /// The type being declared.
        child: SemanticType,
        /// The offending parent.
        parent: SemanticType,
    },
}

/// A raw token which could not be coerced to the semantic type of its argument.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoercionError {
    /// The token does not match the recognition pattern of the type.
    #[error("'{token}' is not a valid {semantic_type}.")]
    Mismatch {
        /// The raw token.
        token: String,
        /// The semantic type of the argument.
        semantic_type: SemanticType,
    },

    /// The converter of the type rejected the token.
    #[error("cannot convert '{token}' to {semantic_type}: {message}.")]
    InvalidConversion {
        /// The raw token.
        token: String,
        /// The semantic type of the argument.
        semantic_type: SemanticType,
        /// The converter's reason.
        message: String,
    },
}

/// A coerced value rejected by the transform of its argument.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot transform '{name}': {message}.")]
pub struct TransformError {
    /// The argument name.
    pub name: String,
    /// The transform's reason.
    pub message: String,
}

/// A failure of [`Argument::parse`](crate::Argument::parse).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The coercion step failed.
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// The transform step failed.
    #[error(transparent)]
    Transform(#[from] TransformError),
}

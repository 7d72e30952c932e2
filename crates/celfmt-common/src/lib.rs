//! Common types for celfmt: type system, AST, source index and declarations.
//!
//! This crate provides the foundational types shared across the celfmt crates:
//!
//! - **Type System**: `CelType` for representing CEL types with parameterized
//!   types like `list<T>`, `map<K, V>`, `optional<T>` and `type(T)`.
//! - **AST**: Expression types (`Expr`, `SpannedExpr`, `BinaryOp`, etc.) for
//!   representing parsed CEL syntax, plus the macro-call table.
//! - **Source**: `Source` line index and `Comment` trivia.
//! - **Declarations**: `FunctionDecl`, `OverloadDecl`, `VariableDecl` for
//!   defining the type environment.
//! - **Extensions**: declaration-only function libraries (collections, crypto,
//!   json, time, strings, xml, ...).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

mod ast;
pub use ast::{
    BinaryOp, Expr, ListElement, MacroCalls, MapEntry, Span, Spanned, SpannedExpr, StructField,
    UnaryOp,
};

mod source;
pub use source::{Comment, Source};

mod decls;
pub use decls::{FunctionDecl, OverloadDecl, VariableDecl};

pub mod extensions;

/// Release identifier of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ==================== CelType ====================

/// CEL types that can be inferred from expressions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CelType {
    // ==================== Primitives ====================
    Bool,
    Int,
    UInt,
    Double,
    String,
    Bytes,

    // ==================== Parameterized Collections ====================
    /// Homogeneous list with element type: `list<T>`
    List(Arc<CelType>),
    /// Key-value map with key and value types: `map<K, V>`
    Map(Arc<CelType>, Arc<CelType>),

    // ==================== Well-known Types ====================
    Timestamp,
    Duration,

    // ==================== Special Types ====================
    Null,
    /// Dynamic/unknown type - compatible with any type
    Dyn,
    /// Type value: `type(T)` - represents the type of a type
    Type(Arc<CelType>),

    // ==================== Type Checking Types ====================
    /// Type parameter for generic overloads (e.g., `T` in `list<T>`)
    TypeParam(Arc<str>),
    /// Optional type: `optional<T>`
    Optional(Arc<CelType>),
    /// Error type - used when type inference fails
    Error,
}

// ==================== Constructors ====================

impl CelType {
    /// Create a list type with the given element type.
    ///
    /// # Example
    /// ```
    /// use celfmt_common::CelType;
    /// let list_of_int = CelType::list(CelType::Int);
    /// assert_eq!(list_of_int.display_name(), "list<int>");
    /// ```
    pub fn list(elem: CelType) -> Self {
        CelType::List(Arc::new(elem))
    }

    /// Create a map type with the given key and value types.
    pub fn map(key: CelType, value: CelType) -> Self {
        CelType::Map(Arc::new(key), Arc::new(value))
    }

    /// Create a type value representing `type(T)`.
    pub fn type_of(inner: CelType) -> Self {
        CelType::Type(Arc::new(inner))
    }

    /// Create a type parameter with the given name.
    pub fn type_param(name: &str) -> Self {
        CelType::TypeParam(Arc::from(name))
    }

    /// Create an optional type: `optional<T>`.
    ///
    /// # Example
    /// ```
    /// use celfmt_common::CelType;
    /// let opt_int = CelType::optional(CelType::Int);
    /// assert_eq!(opt_int.display_name(), "optional<int>");
    /// ```
    pub fn optional(inner: CelType) -> Self {
        CelType::Optional(Arc::new(inner))
    }

    /// `list<dyn>`
    pub fn dyn_list() -> Self {
        CelType::list(CelType::Dyn)
    }

    /// `map<dyn, dyn>`
    pub fn dyn_map() -> Self {
        CelType::map(CelType::Dyn, CelType::Dyn)
    }
}

// ==================== Type Properties ====================

impl CelType {
    /// Returns true if this type is assignable from another type.
    ///
    /// Type `a` is assignable from type `b` if a value of type `b` can be
    /// used where a value of type `a` is expected.
    ///
    /// # Rules
    /// - Any type is assignable from itself
    /// - `Dyn` is assignable from and to any type
    /// - Parameterized types are assignable when their parameters are
    pub fn is_assignable_from(&self, other: &CelType) -> bool {
        if self == other {
            return true;
        }

        if matches!(self, CelType::Dyn | CelType::Error | CelType::TypeParam(_))
            || matches!(other, CelType::Dyn | CelType::Error | CelType::TypeParam(_))
        {
            return true;
        }

        match (self, other) {
            (CelType::List(self_elem), CelType::List(other_elem)) => {
                self_elem.is_assignable_from(other_elem)
            }
            (CelType::Map(self_key, self_val), CelType::Map(other_key, other_val)) => {
                self_key.is_assignable_from(other_key) && self_val.is_assignable_from(other_val)
            }
            (CelType::Optional(self_inner), CelType::Optional(other_inner)) => {
                self_inner.is_assignable_from(other_inner)
            }
            (CelType::Type(self_inner), CelType::Type(other_inner)) => {
                self_inner.is_assignable_from(other_inner)
            }
            _ => false,
        }
    }

    /// Attempt to unify this type with another, collecting type parameter bindings.
    ///
    /// Unlike `is_assignable_from`, this binds type parameters to the
    /// concrete types they meet. Returns `false` on a conflict.
    pub fn unify_with_substitution(
        &self,
        other: &CelType,
        substitutions: &mut HashMap<Arc<str>, CelType>,
    ) -> bool {
        match (self, other) {
            (CelType::TypeParam(name), concrete) | (concrete, CelType::TypeParam(name)) => {
                match substitutions.get(name) {
                    // A dyn binding narrows to the first concrete type it meets.
                    Some(CelType::Dyn) => {
                        substitutions.insert(name.clone(), concrete.clone());
                        true
                    }
                    Some(bound) => bound.is_assignable_from(concrete),
                    None => {
                        substitutions.insert(name.clone(), concrete.clone());
                        true
                    }
                }
            }
            (CelType::List(a), CelType::List(b)) => a.unify_with_substitution(b, substitutions),
            (CelType::Map(ak, av), CelType::Map(bk, bv)) => {
                ak.unify_with_substitution(bk, substitutions)
                    && av.unify_with_substitution(bv, substitutions)
            }
            (CelType::Optional(a), CelType::Optional(b)) => {
                a.unify_with_substitution(b, substitutions)
            }
            (CelType::Type(a), CelType::Type(b)) => a.unify_with_substitution(b, substitutions),
            _ => self.is_assignable_from(other),
        }
    }

    /// Get the element type of a list, or None if not a list.
    pub fn list_elem(&self) -> Option<&CelType> {
        match self {
            CelType::List(elem) => Some(elem),
            _ => None,
        }
    }

    /// Get the key and value types of a map, or None if not a map.
    pub fn map_types(&self) -> Option<(&CelType, &CelType)> {
        match self {
            CelType::Map(key, val) => Some((key, val)),
            _ => None,
        }
    }

    /// Get the inner type of an optional, or None if not an optional.
    pub fn optional_inner(&self) -> Option<&CelType> {
        match self {
            CelType::Optional(inner) => Some(inner),
            _ => None,
        }
    }

    /// Returns true if the type contains an unbound type parameter.
    pub fn has_type_params(&self) -> bool {
        match self {
            CelType::TypeParam(_) => true,
            CelType::List(elem) => elem.has_type_params(),
            CelType::Map(k, v) => k.has_type_params() || v.has_type_params(),
            CelType::Optional(inner) | CelType::Type(inner) => inner.has_type_params(),
            _ => false,
        }
    }
}

// ==================== Display ====================

impl CelType {
    /// Returns the display name of this type as used in CEL.
    pub fn display_name(&self) -> String {
        match self {
            CelType::Bool => "bool".to_string(),
            CelType::Int => "int".to_string(),
            CelType::UInt => "uint".to_string(),
            CelType::Double => "double".to_string(),
            CelType::String => "string".to_string(),
            CelType::Bytes => "bytes".to_string(),
            CelType::List(elem) => format!("list<{}>", elem.display_name()),
            CelType::Map(key, val) => {
                format!("map<{}, {}>", key.display_name(), val.display_name())
            }
            CelType::Timestamp => "google.protobuf.Timestamp".to_string(),
            CelType::Duration => "google.protobuf.Duration".to_string(),
            CelType::Null => "null_type".to_string(),
            CelType::Dyn => "dyn".to_string(),
            CelType::Type(inner) => format!("type({})", inner.display_name()),
            CelType::TypeParam(name) => name.to_string(),
            CelType::Optional(inner) => format!("optional<{}>", inner.display_name()),
            CelType::Error => "*error*".to_string(),
        }
    }
}

impl fmt::Display for CelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

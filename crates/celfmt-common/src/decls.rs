//! Declaration types for variables, functions, and overloads.
//!
//! These define the type environment an expression is checked against.
//! Nothing here carries an implementation: the formatter only needs to know
//! that a name exists and which argument shapes it accepts.

use crate::CelType;

/// Variable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    /// The variable name.
    pub name: String,
    /// The CEL type of the variable.
    pub cel_type: CelType,
}

impl VariableDecl {
    /// Create a new variable declaration.
    pub fn new(name: impl Into<String>, cel_type: CelType) -> Self {
        Self {
            name: name.into(),
            cel_type,
        }
    }
}

/// Function overload declaration.
///
/// Represents a single signature for a function. Functions can have multiple
/// overloads with different parameter types.
#[derive(Debug, Clone, PartialEq)]
pub struct OverloadDecl {
    /// Unique identifier for this overload (e.g., "add_int64_int64").
    pub id: String,
    /// Parameter types (receiver first for member functions).
    pub params: Vec<CelType>,
    /// Return type.
    pub result: CelType,
    /// Whether this is a member function (receiver.method(args)).
    pub is_member: bool,
    /// Type parameters for generic functions (e.g., ["T", "K", "V"]).
    pub type_params: Vec<String>,
}

impl OverloadDecl {
    /// Create a new standalone function overload.
    pub fn function(id: impl Into<String>, params: Vec<CelType>, result: CelType) -> Self {
        Self {
            id: id.into(),
            params,
            result,
            is_member: false,
            type_params: Vec::new(),
        }
    }

    /// Create a new member function overload.
    ///
    /// The first parameter in `params` is the receiver type.
    pub fn method(id: impl Into<String>, params: Vec<CelType>, result: CelType) -> Self {
        Self {
            id: id.into(),
            params,
            result,
            is_member: true,
            type_params: Vec::new(),
        }
    }

    /// Add type parameters for generic functions.
    pub fn with_type_params(mut self, params: Vec<String>) -> Self {
        self.type_params = params;
        self
    }

    /// Get the receiver type for member functions.
    pub fn receiver_type(&self) -> Option<&CelType> {
        if self.is_member {
            self.params.first()
        } else {
            None
        }
    }

    /// Get the argument types (excluding receiver for member functions).
    pub fn arg_types(&self) -> &[CelType] {
        if self.is_member && !self.params.is_empty() {
            &self.params[1..]
        } else {
            &self.params
        }
    }
}

/// Function declaration with overloads.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// The function name.
    pub name: String,
    /// All overloads for this function.
    pub overloads: Vec<OverloadDecl>,
}

impl FunctionDecl {
    /// Create a new function declaration with no overloads.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            overloads: Vec::new(),
        }
    }

    /// Add an overload to this function.
    pub fn with_overload(mut self, overload: OverloadDecl) -> Self {
        self.overloads.push(overload);
        self
    }

    /// Add multiple overloads to this function.
    pub fn with_overloads(mut self, overloads: impl IntoIterator<Item = OverloadDecl>) -> Self {
        self.overloads.extend(overloads);
        self
    }

    /// Merge the overloads of `other` into this declaration, skipping
    /// overload IDs that are already present.
    pub fn merge(&mut self, other: FunctionDecl) {
        for overload in other.overloads {
            if !self.overloads.iter().any(|o| o.id == overload.id) {
                self.overloads.push(overload);
            }
        }
    }

    /// Check if this function has any member overloads.
    pub fn has_member_overloads(&self) -> bool {
        self.overloads.iter().any(|o| o.is_member)
    }

    /// Check if this function has any standalone overloads.
    pub fn has_standalone_overloads(&self) -> bool {
        self.overloads.iter().any(|o| !o.is_member)
    }
}

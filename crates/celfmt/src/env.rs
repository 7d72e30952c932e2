//! Expression environments.
//!
//! An `Env` fixes everything the compiler needs to accept a source: declared
//! variables, function declarations from the standard library and the
//! enabled extension libraries, parser options and the macro registry.
//! Environments are immutable once built; [`Env::shared`] hands out a single
//! process-wide instance of the formatter's configuration.

use std::collections::HashMap;
use std::sync::OnceLock;

use celfmt_checker::{check, CheckResult, FunctionDecl, STANDARD_LIBRARY};
use celfmt_common::extensions::{
    collections_extension, crypto_extension, debug_extension, file_extension, http_extension,
    json_extension, limit_extension, mime_extension, optionals_extension, strings_extension,
    time_extension, time_variables, try_extension, xml_extension,
};
use celfmt_common::{CelType, Source, SpannedExpr, VariableDecl};
use celfmt_parser::macros::{COLLECTIONS_MACROS, OPTIONAL_MACROS};
use celfmt_parser::{parse_with_options, Macro, ParseOptions};
use tracing::debug;

use crate::ast::Ast;
use crate::error::{CompileError, ConfigError};

/// Highest optional types version understood. Version 1 adds the
/// `optMap` and `optFlatMap` macros.
pub const MAX_OPTIONAL_TYPES_VERSION: u32 = 1;

/// A named bundle of declarations an environment can enable.
#[derive(Debug, Clone)]
pub struct Library {
    name: &'static str,
    functions: Vec<FunctionDecl>,
    variables: Vec<VariableDecl>,
    macros: &'static [Macro],
}

impl Library {
    fn new(name: &'static str, functions: Vec<FunctionDecl>) -> Self {
        Self {
            name,
            functions,
            variables: Vec::new(),
            macros: &[],
        }
    }

    fn with_variables(mut self, variables: Vec<VariableDecl>) -> Self {
        self.variables = variables;
        self
    }

    fn with_macros(mut self, macros: &'static [Macro]) -> Self {
        self.macros = macros;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn functions(&self) -> &[FunctionDecl] {
        &self.functions
    }

    pub fn variables(&self) -> &[VariableDecl] {
        &self.variables
    }

    pub fn macros(&self) -> &'static [Macro] {
        self.macros
    }

    /// Collection helpers plus the `as` binding macro.
    pub fn collections() -> Self {
        Self::new("collections", collections_extension()).with_macros(COLLECTIONS_MACROS)
    }

    pub fn crypto() -> Self {
        Self::new("crypto", crypto_extension())
    }

    pub fn json() -> Self {
        Self::new("json", json_extension())
    }

    pub fn time() -> Self {
        Self::new("time", time_extension()).with_variables(time_variables())
    }

    pub fn r#try() -> Self {
        Self::new("try", try_extension())
    }

    pub fn debug() -> Self {
        Self::new("debug", debug_extension())
    }

    pub fn file() -> Self {
        Self::new("file", file_extension())
    }

    pub fn mime() -> Self {
        Self::new("mime", mime_extension())
    }

    pub fn http() -> Self {
        Self::new("http", http_extension())
    }

    pub fn limit() -> Self {
        Self::new("limit", limit_extension())
    }

    pub fn strings() -> Self {
        Self::new("strings", strings_extension())
    }

    /// XML decoding with the given `(name, xsd)` schemas.
    ///
    /// Fails if a schema is malformed.
    pub fn xml(schemas: &[(&str, &str)]) -> Result<Self, ConfigError> {
        Ok(Self::new("xml", xml_extension(schemas)?))
    }

    fn optionals(version: u32) -> Self {
        let library = Self::new("optionals", optionals_extension());
        if version >= 1 {
            library.with_macros(OPTIONAL_MACROS)
        } else {
            library
        }
    }
}

/// Builder for [`Env`].
///
/// # Example
///
/// ```
/// use celfmt::{CelType, EnvBuilder, Library};
///
/// let env = EnvBuilder::new()
///     .variable("state", CelType::Dyn)
///     .library(Library::strings())
///     .build()
///     .unwrap();
///
/// assert!(env.compile("state.name.to_lower()").is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvBuilder {
    variables: Vec<(String, CelType)>,
    libraries: Vec<Library>,
    optional_version: Option<u32>,
    macro_call_tracking: bool,
    container: String,
}

impl EnvBuilder {
    /// An empty builder: standard library only, no variables.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable(mut self, name: impl Into<String>, cel_type: CelType) -> Self {
        self.variables.push((name.into(), cel_type));
        self
    }

    pub fn library(mut self, library: Library) -> Self {
        self.libraries.push(library);
        self
    }

    /// Enable optional values: `.?`, `[?`, `?` elements and the `optional`
    /// functions.
    pub fn optional_types(mut self, version: u32) -> Self {
        self.optional_version = Some(version);
        self
    }

    pub fn macro_call_tracking(mut self, enabled: bool) -> Self {
        self.macro_call_tracking = enabled;
        self
    }

    /// Set the container namespace used to resolve relative names.
    pub fn container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    pub fn build(self) -> Result<Env, ConfigError> {
        let mut libraries = self.libraries;
        let mut parse_options =
            ParseOptions::default().with_macro_call_tracking(self.macro_call_tracking);

        if let Some(version) = self.optional_version {
            if version > MAX_OPTIONAL_TYPES_VERSION {
                return Err(ConfigError::UnsupportedOptionalVersion(version));
            }
            parse_options = parse_options.with_optional_syntax(true);
            libraries.push(Library::optionals(version));
        }

        let mut functions: HashMap<String, FunctionDecl> = STANDARD_LIBRARY
            .iter()
            .map(|f| (f.name.clone(), f.clone()))
            .collect();
        let mut variables = HashMap::new();

        for (name, cel_type) in self.variables {
            declare(&mut variables, name, cel_type)?;
        }
        for library in &libraries {
            for decl in &library.functions {
                match functions.get_mut(&decl.name) {
                    Some(existing) => existing.merge(decl.clone()),
                    None => {
                        functions.insert(decl.name.clone(), decl.clone());
                    }
                }
            }
            for var in &library.variables {
                declare(&mut variables, var.name.clone(), var.cel_type.clone())?;
            }
            parse_options = parse_options.with_macros(library.macros);
        }

        let library_names: Vec<&'static str> = libraries.iter().map(Library::name).collect();
        debug!(
            libraries = ?library_names,
            functions = functions.len(),
            variables = variables.len(),
            "built environment"
        );

        Ok(Env {
            variables,
            functions,
            container: self.container,
            parse_options,
            libraries: library_names,
        })
    }
}

fn declare(
    variables: &mut HashMap<String, CelType>,
    name: String,
    cel_type: CelType,
) -> Result<(), ConfigError> {
    match variables.get(&name) {
        Some(existing) if *existing != cel_type => Err(ConfigError::ConflictingVariable {
            first: existing.display_name(),
            second: cel_type.display_name(),
            name,
        }),
        Some(_) => Ok(()),
        None => {
            variables.insert(name, cel_type);
            Ok(())
        }
    }
}

/// An immutable compilation environment.
#[derive(Debug, Clone)]
pub struct Env {
    variables: HashMap<String, CelType>,
    functions: HashMap<String, FunctionDecl>,
    container: String,
    parse_options: ParseOptions,
    libraries: Vec<&'static str>,
}

impl Env {
    /// The formatter's environment: a dynamic `state` variable, every
    /// extension library, optional types version 1 and macro call tracking.
    pub fn celfmt() -> Result<Self, ConfigError> {
        EnvBuilder::new()
            .variable("state", CelType::Dyn)
            .library(Library::collections())
            .library(Library::crypto())
            .library(Library::json())
            .library(Library::time())
            .library(Library::r#try())
            .library(Library::debug())
            .library(Library::file())
            .library(Library::mime())
            .library(Library::http())
            .library(Library::limit())
            .library(Library::strings())
            .library(Library::xml(&[])?)
            .optional_types(1)
            .macro_call_tracking(true)
            .build()
    }

    /// [`Env::celfmt`], built once per process.
    pub fn shared() -> Result<&'static Self, ConfigError> {
        static SHARED: OnceLock<Result<Env, ConfigError>> = OnceLock::new();
        SHARED.get_or_init(Env::celfmt).as_ref().map_err(Clone::clone)
    }

    pub fn variables(&self) -> &HashMap<String, CelType> {
        &self.variables
    }

    pub fn functions(&self) -> &HashMap<String, FunctionDecl> {
        &self.functions
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn parse_options(&self) -> &ParseOptions {
        &self.parse_options
    }

    /// Names of the enabled libraries, in the order they were added.
    pub fn libraries(&self) -> &[&'static str] {
        &self.libraries
    }

    /// Parse without type checking.
    pub fn parse_only(&self, source: &str) -> Result<Ast, CompileError> {
        let result = parse_with_options(source, &self.parse_options);
        let text = Source::new(source);
        match result.ast {
            Some(expr) if result.errors.is_empty() => Ok(Ast::new_unchecked(
                expr,
                text,
                result.comments,
                result.macro_calls,
            )),
            _ => Err(CompileError::Parse {
                input: text,
                errors: result.errors,
            }),
        }
    }

    /// Type check an expression against this environment.
    pub fn check(&self, expr: &SpannedExpr) -> CheckResult {
        check(expr, &self.variables, &self.functions, &self.container)
    }

    /// Parse and type check. Either every stage succeeds or no AST is
    /// returned.
    pub fn compile(&self, source: &str) -> Result<Ast, CompileError> {
        let ast = self.parse_only(source)?;
        let result = self.check(ast.expr());
        if result.is_ok() {
            Ok(ast.with_type_info(result))
        } else {
            Err(CompileError::Check {
                input: ast.source().clone(),
                errors: result.errors,
            })
        }
    }
}

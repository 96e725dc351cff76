//! Data model for parsed documentation — independent of parsing and rendering.

use std::collections::BTreeMap;
use std::fmt;

/// Complete parsed document from a single `---@meta` file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ModuleDoc {
    /// Module identifier from the leading `@meta` tag
    pub module_name: String,
    /// Documented functions keyed by bare name. Ordered, so iteration is sorted.
    pub functions: BTreeMap<String, FunctionDoc>,
}

impl ModuleDoc {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            functions: BTreeMap::new(),
        }
    }

    /// Commit a finalized function, returning the entry it replaced (if any).
    pub fn insert(&mut self, func: FunctionDoc) -> Option<FunctionDoc> {
        self.functions.insert(func.name.clone(), func)
    }
}

/// How a function is bound to its enclosing table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `function t.f()`
    Dot,
    /// `function t:f()`
    Colon,
    /// `function f()`
    #[default]
    Bare,
}

impl Separator {
    pub fn as_str(self) -> &'static str {
        match self {
            Separator::Dot => ".",
            Separator::Colon => ":",
            Separator::Bare => "",
        }
    }

    pub fn from_capture(text: Option<&str>) -> Self {
        match text {
            Some(".") => Separator::Dot,
            Some(":") => Separator::Colon,
            _ => Separator::Bare,
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single documented function.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FunctionDoc {
    /// Bare function name taken from the signature line
    pub name: String,
    /// Enclosing table, when the signature was qualified (`ctx.name`)
    pub context_name: Option<String>,
    pub separator: Separator,
    /// @class
    pub class_name: Option<String>,
    /// @name, kept for reference; the signature decides `name`
    pub declared_name: Option<String>,
    /// @param entries in documentation order
    pub parameters: Vec<Param>,
    /// @return entries (a later tag replaces an earlier one)
    pub returns: Vec<ReturnDoc>,
    /// One entry per description line, empty strings for spacing
    pub description: Vec<String>,
    /// Raw lines of the multiline @example tag
    pub examples: Vec<String>,
    /// @meta carried by this particular block
    pub meta_tag: Option<String>,
}

impl FunctionDoc {
    /// Display name as written at the definition site, e.g. `mymod.add`.
    pub fn qualified_name(&self) -> String {
        match self.context_name {
            Some(ref ctx) => format!("{}{}{}", ctx, self.separator, self.name),
            None => self.name.clone(),
        }
    }
}

/// Parsed @param entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    /// Opaque type expression, e.g. `string|nil`
    pub ty: String,
    pub description: String,
}

/// Parsed @return entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnDoc {
    /// Comma-separated types, trimmed and de-duplicated in order
    pub types: Vec<String>,
    pub description: String,
}

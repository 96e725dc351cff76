//! gludoc — generate Markdown API documentation from annotated Lua definition files.
//!
//! A documentation file starts with `---@meta <module>` and documents each
//! function with a `---` comment block directly above a stub definition:
//!
//! ```text
//! ---@meta mymod
//! --- Adds two numbers.
//! --- @param a number - first operand
//! --- @return number - the sum
//! function mymod.add(a, b) end
//! ```
//!
//! [`parser::parse`] turns such a file into a [`model::ModuleDoc`],
//! [`render::render`] turns that into Markdown, and [`driver`] runs both over a
//! directory tree.

pub mod driver;
pub mod model;
pub mod parser;
pub mod render;

pub use model::{FunctionDoc, ModuleDoc, Param, ReturnDoc, Separator};
pub use parser::{parse, ParseError};
pub use render::render;

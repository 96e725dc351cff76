//! Markdown renderer.
//!
//! Pure and deterministic: the same [`ModuleDoc`] always renders to the same
//! bytes. Functions come out sorted by name because [`ModuleDoc::functions`]
//! is an ordered map.

use crate::model::*;

/// Render a whole module document.
pub fn render(doc: &ModuleDoc) -> String {
    let mut output = format!("# {}\n\n", doc.module_name);

    for (key, func) in &doc.functions {
        if func.name.is_empty() {
            log::error!(
                "{}: function entry `{}` has no name; section omitted",
                doc.module_name,
                key
            );
            continue;
        }
        output.push_str(&render_function(func));
        output.push('\n');
    }

    output
}

/// Render a single function's section, ending with a newline.
fn render_function(func: &FunctionDoc) -> String {
    let mut lines: Vec<String> = vec![format!("## {}", func.qualified_name())];

    if let Some(description) = join_trimmed(&func.description) {
        lines.push(String::new());
        lines.push(description);
    }

    if !func.parameters.is_empty() {
        push_block(&mut lines, "Parameters", func.parameters.iter().map(render_param));
    }

    if !func.returns.is_empty() {
        push_block(&mut lines, "Returns", func.returns.iter().map(render_return));
    }

    if let Some(examples) = join_trimmed(&func.examples) {
        push_block(&mut lines, "Examples", std::iter::once(examples));
    }

    let mut section = lines.join("\n");
    section.push('\n');
    section
}

/// Blank line, bold label, blank line, then the block's lines.
fn push_block(lines: &mut Vec<String>, label: &str, items: impl Iterator<Item = String>) {
    lines.push(String::new());
    lines.push(format!("**{}**", label));
    lines.push(String::new());
    lines.extend(items);
}

/// `- `name` (`type`) - description`
fn render_param(param: &Param) -> String {
    let mut line = format!("- `{}` (`{}`)", param.name, param.ty);
    if !param.description.is_empty() {
        line.push_str(" - ");
        line.push_str(&param.description);
    }
    line
}

/// `` `t1`, `t2` - description ``
fn render_return(ret: &ReturnDoc) -> String {
    let mut line = ret
        .types
        .iter()
        .map(|t| format!("`{}`", t))
        .collect::<Vec<_>>()
        .join(", ");
    if !ret.description.is_empty() {
        line.push_str(" - ");
        line.push_str(&ret.description);
    }
    line
}

/// Join lines with newlines after dropping leading and trailing blank entries.
/// `None` when nothing but blanks remain.
fn join_trimmed(lines: &[String]) -> Option<String> {
    let first = lines.iter().position(|l| !l.trim().is_empty())?;
    let last = lines.iter().rposition(|l| !l.trim().is_empty())?;
    Some(lines[first..=last].join("\n"))
}

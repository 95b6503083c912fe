//! Template compilation.
//!
//! The compiler walks a surface subtree depth-first. On each element it
//! applies the first registered directive whose attribute is present, then
//! binds a whole-content `{{ expression }}` interpolation, then descends
//! into the children unless the directive asked it not to.

use crate::directive::DirectiveRegistry;
use crate::view_model::{BindingProps, ViewModel};
use alloc::string::String;
use alloc::vec::Vec;
use tracing::debug;
use weft_core::Result;
use weft_dom::markup::Fragment;
use weft_dom::{NodeKind, NodeRef};

/// What the compiler does after a directive handler returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// Bind interpolation and descend into the children.
    Continue,
    /// The handler has taken care of the subtree.
    Stop,
}

/// Compiles `node` and its descendants.
pub(crate) fn compile_node(vm: &ViewModel, node: NodeRef) -> Result<()> {
    let surface = vm.surface();
    if surface.kind(node)? != NodeKind::Element {
        return Ok(());
    }

    if apply_directive(vm, node)? == Traversal::Stop {
        return Ok(());
    }
    interpolate(vm, node)?;

    for child in surface.children(node)? {
        // Handlers may have moved or dropped later siblings.
        if surface.parent(child)? != Some(node) {
            continue;
        }
        compile_node(vm, child)?;
    }
    Ok(())
}

/// Applies the first directive whose attribute is present on `node`.
///
/// An attribute with an empty value counts as absent.
fn apply_directive(vm: &ViewModel, node: NodeRef) -> Result<Traversal> {
    let surface = vm.surface();
    for directive in vm.registry().iter() {
        let expression = match surface.attribute(node, directive.name())? {
            Some(value) if !value.trim().is_empty() => value,
            _ => continue,
        };
        surface.remove_attribute(node, directive.name())?;
        debug!(directive = directive.name(), expression = %expression, "applying directive");
        return directive.handle(vm, node, &expression);
    }
    Ok(Traversal::Continue)
}

/// Binds the content of `node` if it is exactly one `{{ expression }}`.
fn interpolate(vm: &ViewModel, node: NodeRef) -> Result<()> {
    let markup = vm.surface().inner_markup(node)?;
    if let Some(expression) = interpolation(&markup) {
        vm.bind_dom(node, expression, &BindingProps::content(), false, None)?;
    }
    Ok(())
}

/// Extracts the expression of whole-content interpolation markup.
///
/// Surrounding whitespace is ignored. Content with more than one pair of
/// braces, or with text outside them, is not an interpolation.
pub fn interpolation(content: &str) -> Option<&str> {
    let inner = content.trim().strip_prefix("{{")?.strip_suffix("}}")?;
    if inner.contains("{{") || inner.contains("}}") {
        return None;
    }
    let inner = inner.trim();
    (!inner.is_empty()).then_some(inner)
}

/// Copies repeat template fragments with `item` rewritten to `accessor`
/// inside interpolations and inside the values of registered directives.
pub fn substitute_fragments(
    fragments: &[Fragment],
    item: &str,
    accessor: &str,
    registry: &DirectiveRegistry,
) -> Vec<Fragment> {
    fragments
        .iter()
        .map(|fragment| match fragment {
            Fragment::Text(text) => Fragment::Text(substitute_interpolations(text, item, accessor)),
            Fragment::Comment(text) => Fragment::Comment(text.clone()),
            Fragment::Element {
                tag,
                attributes,
                children,
            } => Fragment::Element {
                tag: tag.clone(),
                attributes: attributes
                    .iter()
                    .map(|(name, value)| {
                        let value = if registry.contains(name) {
                            substitute_expression(value, item, accessor)
                        } else {
                            substitute_interpolations(value, item, accessor)
                        };
                        (name.clone(), value)
                    })
                    .collect(),
                children: substitute_fragments(children, item, accessor, registry),
            },
        })
        .collect()
}

/// Rewrites `item` inside every `{{ ... }}` span of `text`.
pub fn substitute_interpolations(text: &str, item: &str, accessor: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        let close = open + 2 + close;
        out.push_str(&rest[..open + 2]);
        out.push_str(&substitute_expression(&rest[open + 2..close], item, accessor));
        out.push_str("}}");
        rest = &rest[close + 2..];
    }
    out.push_str(rest);
    out
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Rewrites every identifier equal to `item` that starts a path.
///
/// Member names after `.` and quoted text are left alone, so with item
/// `fruit`, `fruit.name` becomes `fruits[0].name` but `user.fruit` and
/// `'fruit'` are unchanged.
pub fn substitute_expression(expression: &str, item: &str, accessor: &str) -> String {
    let mut out = String::with_capacity(expression.len() + accessor.len());
    let mut chars = expression.char_indices().peekable();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut after_dot = false;

    while let Some((start, c)) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        if is_ident_char(c) {
            let mut end = start + c.len_utf8();
            while let Some(&(idx, next)) = chars.peek() {
                if !is_ident_char(next) {
                    break;
                }
                end = idx + next.len_utf8();
                chars.next();
            }
            let word = &expression[start..end];
            if is_ident_start(c) && word == item && !after_dot {
                out.push_str(accessor);
            } else {
                out.push_str(word);
            }
            after_dot = false;
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '.' => after_dot = true,
            c if c.is_whitespace() => {}
            _ => after_dot = false,
        }
        out.push(c);
    }
    out
}

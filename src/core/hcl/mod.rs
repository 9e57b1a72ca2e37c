//! Helpers for editing `hcl_edit` trees without losing the comments and whitespace attached to
//! the nodes that stay.

pub mod format;

pub use format::format;

use crate::core::error::MigrateError;
use crate::core::types::ErrorCategory;
use hcl_edit::expr::Expression;
use hcl_edit::structure::{Attribute, Block, BlockLabel, Body, Structure};
use hcl_edit::{Decor, Decorate, Decorated, Ident};

/// The declared type of a `resource "<type>" "<name>"` block.
pub fn resource_type(block: &Block) -> Option<&str> {
    if block.ident.as_str() != "resource" || block.labels.len() < 2 {
        return None;
    }
    Some(block.labels[0].as_str())
}

/// Replace the type label of a resource block, keeping its surrounding whitespace.
pub fn set_resource_type(block: &mut Block, resource_type: &str) {
    let Some(first) = block.labels.first() else {
        return;
    };
    let decor = match first {
        BlockLabel::Ident(ident) => ident.decor().clone(),
        BlockLabel::String(string) => string.decor().clone(),
    };
    let mut label = Decorated::new(resource_type.to_string());
    *label.decor_mut() = decor;
    block.labels[0] = BlockLabel::String(label);
}

/// Layout of a body that survives taking its structures apart.
#[derive(Debug, Clone)]
pub struct BodyLayout {
    decor: Decor,
    prefer_oneline: bool,
    prefer_omit_trailing_newline: bool,
}

impl BodyLayout {
    /// Split a body into its layout and its structures.
    pub fn split(body: Body) -> (BodyLayout, Vec<Structure>) {
        let layout = BodyLayout {
            decor: body.decor().clone(),
            prefer_oneline: body.prefer_oneline(),
            prefer_omit_trailing_newline: body.prefer_omit_trailing_newline(),
        };
        (layout, body.into_iter().collect())
    }

    pub fn assemble<I: IntoIterator<Item = Structure>>(self, structures: I) -> Body {
        let mut body: Body = structures.into_iter().collect();
        body.set_prefer_oneline(self.prefer_oneline);
        body.set_prefer_omit_trailing_newline(self.prefer_omit_trailing_newline);
        *body.decor_mut() = self.decor;
        body
    }
}

/// Rebuild `body` from its structures, dropping those for which `f` returns `None`.
pub fn rewrite_body<F>(body: &mut Body, f: F)
where
    F: FnMut(Structure) -> Option<Structure>,
{
    let (layout, structures) = BodyLayout::split(std::mem::take(body));
    *body = layout.assemble(structures.into_iter().filter_map(f));
}

pub fn has_attribute(body: &Body, key: &str) -> bool {
    body.iter().any(|structure| match structure {
        Structure::Attribute(attr) => attr.key.as_str() == key,
        Structure::Block(_) => false,
    })
}

/// Rename attribute `from` to `to`. Nothing happens when `to` is already set.
pub fn rename_attribute(body: &mut Body, from: &str, to: &str) -> bool {
    if !has_attribute(body, from) || has_attribute(body, to) {
        return false;
    }
    rewrite_body(body, |structure| match structure {
        Structure::Attribute(mut attr) if attr.key.as_str() == from => {
            let mut key = Decorated::new(Ident::new(to));
            *key.decor_mut() = attr.key.decor().clone();
            attr.key = key;
            Some(Structure::Attribute(attr))
        }
        other => Some(other),
    });
    true
}

pub fn remove_attribute(body: &mut Body, key: &str) -> bool {
    if !has_attribute(body, key) {
        return false;
    }
    rewrite_body(body, |structure| match structure {
        Structure::Attribute(attr) if attr.key.as_str() == key => None,
        other => Some(other),
    });
    true
}

/// Append `key = <source>` to the body. `source` must be a valid HCL expression.
pub fn push_attribute(body: &mut Body, key: &str, source: &str) -> Result<(), MigrateError> {
    let value = parse_expression(source)?;
    body.push(Structure::Attribute(Attribute::new(Ident::new(key), value)));
    Ok(())
}

/// Turn nested `name { ... }` blocks into a `name = { ... }` object attribute.
///
/// Only the first block with that name is converted; repeated blocks are dropped, since the
/// object form cannot hold more than one.
pub fn block_to_object_attribute(body: &mut Body, name: &str) -> Result<bool, MigrateError> {
    let has_block = body.iter().any(|structure| match structure {
        Structure::Block(block) => block.ident.as_str() == name,
        Structure::Attribute(_) => false,
    });
    if !has_block || has_attribute(body, name) {
        return Ok(false);
    }

    let mut converted = false;
    let mut failure = None;
    rewrite_body(body, |structure| match structure {
        Structure::Block(block) if block.ident.as_str() == name => {
            if converted || failure.is_some() {
                return None;
            }
            converted = true;
            let value = match parse_expression(&object_source(&block.body)) {
                Ok(value) => value,
                Err(err) => {
                    failure = Some(err);
                    return Some(Structure::Block(block));
                }
            };
            let mut attr = Attribute::new(Ident::new(name), value);
            *attr.decor_mut() = block.decor().clone();
            Some(Structure::Attribute(attr))
        }
        other => Some(other),
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(converted),
    }
}

/// Object constructor source for a block body. Comments attached to the body and to each
/// structure are carried into the object text.
fn object_source(body: &Body) -> String {
    let mut source = String::from("{");
    source.push_str(prefix_text(body.decor()));
    source.push('\n');
    for structure in body.iter() {
        source.push_str(prefix_text(structure.decor()));
        match structure {
            Structure::Attribute(attr) => {
                let value = attr.value.to_string();
                source.push_str(&format!("{} = {}", attr.key.as_str(), value.trim()));
            }
            Structure::Block(block) => {
                source.push_str(&format!(
                    "{} = {}",
                    block.ident.as_str(),
                    object_source(&block.body)
                ));
            }
        }
        source.push_str(suffix_text(structure.decor()));
        source.push('\n');
    }
    source.push_str(suffix_text(body.decor()));
    source.push('}');
    source
}

fn prefix_text(decor: &Decor) -> &str {
    decor.prefix().map(|raw| &**raw).unwrap_or_default()
}

fn suffix_text(decor: &Decor) -> &str {
    decor.suffix().map(|raw| &**raw).unwrap_or_default()
}

fn parse_expression(source: &str) -> Result<Expression, MigrateError> {
    hcl_edit::parser::parse_expr(source).map_err(|err| {
        MigrateError::new(
            ErrorCategory::TransformerError,
            format!("generated expression does not parse: {}", err.message()),
        )
        .with_context("expression", source)
    })
}

//! Implicit binding: rewrites bare string-member names into member accesses
//! on the binding name, so `length === 3` evaluates as `$.length === 3`.
//!
//! The rewrite is token-aware rather than textual. A name is left alone
//! when it is
//! - preceded by `.` (`x.substr` is already a member access),
//! - part of a longer identifier (`asubstr`, `substr123`, `$length`),
//! - an object-literal key (`{length: length}` -> `{length: $.length}`),
//! - inside a string literal.
//!
//! Shorthand properties keep their key: `{length}` -> `{length: $.length}`.

use crate::error::BindingError;
use crate::lexer::{Lexer, Punct, Token};

/// Names of the string type's properties and methods that bind implicitly.
pub const STRING_MEMBERS: &[&str] = &[
    "length",
    "at",
    "charAt",
    "charCodeAt",
    "codePointAt",
    "concat",
    "endsWith",
    "includes",
    "indexOf",
    "lastIndexOf",
    "localeCompare",
    "match",
    "padEnd",
    "padStart",
    "repeat",
    "replace",
    "replaceAll",
    "search",
    "slice",
    "split",
    "startsWith",
    "substr",
    "substring",
    "toLocaleLowerCase",
    "toLocaleUpperCase",
    "toLowerCase",
    "toString",
    "toUpperCase",
    "trim",
    "trimEnd",
    "trimLeft",
    "trimRight",
    "trimStart",
    "valueOf",
];

/// True if `name` is one of [`STRING_MEMBERS`].
pub fn is_string_member(name: &str) -> bool {
    STRING_MEMBERS.contains(&name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bracket {
    Paren,
    Square,
    Object,
}

/// Rewrites every free string-member name in `snippet` to
/// `binding_name.name`, preserving all other text byte for byte.
pub fn try_bind(snippet: &str, binding_name: &str) -> Result<String, BindingError> {
    let tokens = Lexer::tokenize(snippet)?;
    let mut out = String::with_capacity(snippet.len() + 8);
    let mut copied = 0;
    let mut brackets: Vec<Bracket> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if let Some(bracket) = opened(token) {
            brackets.push(bracket);
            continue;
        }
        if closes(token) {
            brackets.pop();
            continue;
        }
        let Some(name) = token.ident() else {
            continue;
        };
        if !is_string_member(name) {
            continue;
        }
        let prev = i.checked_sub(1).map(|p| &tokens[p]);
        let next = tokens.get(i + 1);
        if prev.is_some_and(|t| t.is_punct(Punct::Dot)) {
            continue;
        }

        let replacement = if is_key_position(prev, brackets.last()) {
            if next.is_some_and(|t| t.is_punct(Punct::Colon)) {
                continue;
            }
            format!("{name}: {binding_name}.{name}")
        } else {
            format!("{binding_name}.{name}")
        };

        out.push_str(&snippet[copied..token.start]);
        out.push_str(&replacement);
        copied = token.end;
    }

    out.push_str(&snippet[copied..]);
    Ok(out)
}

/// Like [`try_bind`], but hands back the snippet untouched when it cannot
/// be tokenized; the parser then reports the problem with its position.
pub fn bind(snippet: &str, binding_name: &str) -> String {
    match try_bind(snippet, binding_name) {
        Ok(bound) => bound,
        Err(err) => {
            log::debug!("implicit binding skipped: {}", err);
            snippet.to_string()
        }
    }
}

fn opened(token: &Token) -> Option<Bracket> {
    if token.is_punct(Punct::LParen) {
        Some(Bracket::Paren)
    } else if token.is_punct(Punct::LBracket) {
        Some(Bracket::Square)
    } else if token.is_punct(Punct::LBrace) {
        Some(Bracket::Object)
    } else {
        None
    }
}

fn closes(token: &Token) -> bool {
    token.is_punct(Punct::RParen) || token.is_punct(Punct::RBracket) || token.is_punct(Punct::RBrace)
}

/// Directly inside an object literal, right after `{` or `,`.
fn is_key_position(prev: Option<&Token>, innermost: Option<&Bracket>) -> bool {
    innermost == Some(&Bracket::Object)
        && prev.is_some_and(|t| t.is_punct(Punct::LBrace) || t.is_punct(Punct::Comma))
}

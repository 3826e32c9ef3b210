//! Route pattern tokenization.
//!
//! # Responsibilities
//! - Classify a token as literal, part-variable (`{name}`) or end-variable (`{*name}`)
//! - Split a full pattern into an ordered token sequence
//! - Reject malformed variable syntax at registration time
//! - Cut a captured value out of the remaining request path

use thiserror::Error;

use super::SEPARATOR;

/// Kind of a single pattern token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Text matched byte for byte.
    Literal,
    /// `{name}`: one path segment, up to the next `/`.
    PartVariable,
    /// `{*name}`: the rest of the path, `/` included.
    EndVariable,
}

/// A classified piece of a route pattern, borrowing from the pattern text.
///
/// Variable tokens carry their name without the surrounding braces. The name
/// may be empty, which makes the capture anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternToken<'a> {
    Literal(&'a str),
    PartVariable(&'a str),
    EndVariable(&'a str),
}

impl<'a> PatternToken<'a> {
    pub fn kind(&self) -> TokenKind {
        match self {
            PatternToken::Literal(_) => TokenKind::Literal,
            PatternToken::PartVariable(_) => TokenKind::PartVariable,
            PatternToken::EndVariable(_) => TokenKind::EndVariable,
        }
    }
}

/// Errors raised while parsing a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A `{` that does not open a well-formed variable.
    #[error("invalid pattern {pattern:?}: malformed variable at byte {position}")]
    MalformedVariable { pattern: String, position: usize },

    /// A `}` outside of any variable.
    #[error("invalid pattern {pattern:?}: unmatched '}}' at byte {position}")]
    UnmatchedBrace { pattern: String, position: usize },

    /// An end-variable followed by further tokens.
    #[error("invalid pattern {pattern:?}: catch-all variable {{*{name}}} must be the final token")]
    EndVariableNotLast { pattern: String, name: String },

    /// A scoped pattern whose dot segments climb out of its prefix.
    #[error("pattern {pattern:?} leaves its prefix {prefix:?}")]
    OutsidePrefix { prefix: String, pattern: String },
}

/// Length of the well-formed variable token starting at `bytes[0]`, if any.
fn variable_len(bytes: &[u8]) -> Option<usize> {
    if bytes.first() != Some(&b'{') {
        return None;
    }
    let mut i = if bytes.get(1) == Some(&b'*') { 2 } else { 1 };
    while let Some(&b) = bytes.get(i) {
        match b {
            b'}' => return Some(i + 1),
            b if b.is_ascii_alphabetic() || b == b'_' => i += 1,
            _ => return None,
        }
    }
    None
}

/// Classify a single token.
///
/// A token is a variable only if it is wrapped in braces in its entirety;
/// `{*` marks an end-variable.
pub fn classify(token: &str) -> TokenKind {
    let bytes = token.as_bytes();
    if variable_len(bytes) != Some(bytes.len()) {
        return TokenKind::Literal;
    }
    if bytes[1] == b'*' {
        TokenKind::EndVariable
    } else {
        TokenKind::PartVariable
    }
}

fn token_from(text: &str) -> PatternToken<'_> {
    match classify(text) {
        TokenKind::Literal => PatternToken::Literal(text),
        TokenKind::PartVariable => PatternToken::PartVariable(&text[1..text.len() - 1]),
        TokenKind::EndVariable => PatternToken::EndVariable(&text[2..text.len() - 1]),
    }
}

/// Split a pattern into literal runs and variable tokens.
///
/// Empty literal runs at either end are dropped. A pattern without variables
/// yields one literal token holding the whole pattern.
pub fn split_pattern(pattern: &str) -> Result<Vec<PatternToken<'_>>, PatternError> {
    let bytes = pattern.as_bytes();
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                let len = variable_len(&bytes[i..]).ok_or_else(|| {
                    PatternError::MalformedVariable {
                        pattern: pattern.to_string(),
                        position: i,
                    }
                })?;
                if literal_start < i {
                    tokens.push(PatternToken::Literal(&pattern[literal_start..i]));
                }
                tokens.push(token_from(&pattern[i..i + len]));
                i += len;
                literal_start = i;
            }
            b'}' => {
                return Err(PatternError::UnmatchedBrace {
                    pattern: pattern.to_string(),
                    position: i,
                });
            }
            _ => i += 1,
        }
    }
    if literal_start < bytes.len() {
        tokens.push(PatternToken::Literal(&pattern[literal_start..]));
    }
    if tokens.is_empty() {
        tokens.push(PatternToken::Literal(pattern));
    }

    let last = tokens.len() - 1;
    if let Some((_, PatternToken::EndVariable(name))) = tokens
        .iter()
        .enumerate()
        .find(|(index, token)| *index != last && token.kind() == TokenKind::EndVariable)
    {
        return Err(PatternError::EndVariableNotLast {
            pattern: pattern.to_string(),
            name: name.to_string(),
        });
    }

    Ok(tokens)
}

/// Cut the value a variable of `kind` captures from `remainder`.
///
/// Returns `(captured, leftover)`. End-variables take everything; part-variables
/// stop before the next `/`. Literal kinds capture nothing.
pub fn capture(kind: TokenKind, remainder: &str) -> (&str, &str) {
    match kind {
        TokenKind::Literal => ("", remainder),
        TokenKind::EndVariable => (remainder, ""),
        TokenKind::PartVariable => {
            let end = remainder
                .bytes()
                .position(|b| b == SEPARATOR)
                .unwrap_or(remainder.len());
            remainder.split_at(end)
        }
    }
}

/// Parse a variable token against the remaining request path.
///
/// Returns `(name, matched, leftover)`, or `None` when `token` is a literal.
pub fn parse_variable<'t, 'p>(token: &'t str, remainder: &'p str) -> Option<(&'t str, &'p str, &'p str)> {
    let (kind, name) = match token_from(token) {
        PatternToken::Literal(_) => return None,
        PatternToken::PartVariable(name) => (TokenKind::PartVariable, name),
        PatternToken::EndVariable(name) => (TokenKind::EndVariable, name),
    };
    let (matched, leftover) = capture(kind, remainder);
    Some((name, matched, leftover))
}

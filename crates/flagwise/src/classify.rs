//! Token classification against the declared flags.

use crate::registry::Registry;

/// How a single token relates to the declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A declared flag that takes no value.
    Switch(&'a str),
    /// A declared value-taking flag; the value is the next token.
    ValueFlag(&'a str),
    /// `flag=value` where `flag` is a declared value-taking flag.
    Assigned { flag: &'a str, value: &'a str },
    /// Anything else.
    NonFlag(&'a str),
}

/// True iff `token` spells a declared flag that takes no value.
pub fn is_valueless_flag(registry: &Registry, token: &str) -> bool {
    registry.find(token).is_some_and(|spec| !spec.takes_value)
}

/// True iff `token` spells a declared flag that takes a value.
pub fn is_value_flag(registry: &Registry, token: &str) -> bool {
    registry.find(token).is_some_and(|spec| spec.takes_value)
}

/// Split `flag=value` on the first `=`.
///
/// Only matches when the left-hand side is a declared value-taking flag, so
/// `--define=a=b` yields `("--define", "a=b")` and `--verbose=1` on a switch
/// yields `None`.
pub fn try_split_equals<'a>(registry: &Registry, token: &'a str) -> Option<(&'a str, &'a str)> {
    let (flag, value) = token.split_once('=')?;
    is_value_flag(registry, flag).then_some((flag, value))
}

/// Classify one token. The split form is only consulted when the token is not
/// itself a declared spelling.
pub fn classify<'a>(registry: &Registry, token: &'a str) -> Token<'a> {
    if is_valueless_flag(registry, token) {
        Token::Switch(token)
    } else if is_value_flag(registry, token) {
        Token::ValueFlag(token)
    } else if let Some((flag, value)) = try_split_equals(registry, token) {
        Token::Assigned { flag, value }
    } else {
        Token::NonFlag(token)
    }
}

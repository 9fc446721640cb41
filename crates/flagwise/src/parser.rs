//! The parse pass and post-pass validation.
//!
//! The pass walks the tokens once, left to right, starting after the
//! invocation name. It is a two-state machine:
//!
//! - [`ScanState::Scanning`]: tokens are classified against the registry.
//!   Unrecognized tokens are collected as non-flags and judged later by the
//!   non-flag count check, not rejected on the spot.
//! - [`ScanState::PositionalOnly`]: every token is a non-flag.
//!
//! The switch to `PositionalOnly` is permanent and happens either on a
//! literal `--` (which is dropped) or as soon as the number of flag
//! occurrences reaches the number of declared flags. The second rule means
//! that after every declared flag has been seen, a token spelled like a
//! declared flag is still collected as a non-flag.

use crate::classify::{Token, classify};
use crate::error::ParseError;
use crate::matches::Matches;
use crate::registry::Registry;

/// Literal token that ends flag parsing.
pub const DELIMITER: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Scanning,
    PositionalOnly,
}

/// Runs the parse pass for one registry.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'r> {
    registry: &'r Registry,
    non_flags_required: usize,
}

impl<'r> Parser<'r> {
    /// `non_flags_required == 0` means no non-flags are accepted at all.
    pub fn new(registry: &'r Registry, non_flags_required: usize) -> Self {
        Self {
            registry,
            non_flags_required,
        }
    }

    /// Scan `argv` (index 0 is the invocation name) and validate the result.
    ///
    /// On failure `matches` keeps whatever the pass had collected so far.
    /// Alias backfill happens as part of validation; fallbacks are not
    /// applied here, see [`backfill_fallbacks`].
    pub fn parse<S: AsRef<str>>(&self, argv: &[S], matches: &mut Matches) -> Result<(), ParseError> {
        self.scan(argv, matches)?;
        self.validate(matches)
    }

    /// The single left-to-right pass.
    pub fn scan<S: AsRef<str>>(&self, argv: &[S], matches: &mut Matches) -> Result<(), ParseError> {
        let total = self.registry.total();
        let mut state = ScanState::Scanning;
        let mut seen = 0usize;
        let mut i = 1usize;

        while i < argv.len() {
            let token = argv[i].as_ref();
            i += 1;

            if state == ScanState::PositionalOnly {
                matches.push_non_flag(token);
                continue;
            }

            if token == DELIMITER {
                tracing::debug!(index = i - 1, "delimiter seen; remaining tokens are non-flags");
                state = ScanState::PositionalOnly;
                continue;
            }

            match classify(self.registry, token) {
                Token::Switch(flag) => matches.insert(flag, ""),
                Token::ValueFlag(flag) => {
                    let Some(value) = argv.get(i) else {
                        return Err(ParseError::MissingValue {
                            flag: flag.to_string(),
                        });
                    };
                    matches.insert(flag, value.as_ref());
                    i += 1;
                }
                Token::Assigned { flag, value } => matches.insert(flag, value),
                Token::NonFlag(token) => {
                    matches.push_non_flag(token);
                    continue;
                }
            }

            seen += 1;
            if seen >= total {
                tracing::debug!(seen, "all declared flags seen; remaining tokens are non-flags");
                state = ScanState::PositionalOnly;
            }
        }

        Ok(())
    }

    /// Post-pass checks, first failure wins.
    pub fn validate(&self, matches: &mut Matches) -> Result<(), ParseError> {
        self.check_non_flag_count(matches)?;
        self.check_values(matches)?;
        self.check_required(matches)
    }

    fn check_non_flag_count(&self, matches: &Matches) -> Result<(), ParseError> {
        let count = matches.non_flags().len();
        match self.non_flags_required {
            0 if count > 0 => Err(ParseError::UnknownArguments),
            expected if expected > 0 && count != expected => {
                Err(ParseError::NonFlagCount { expected })
            }
            _ => Ok(()),
        }
    }

    /// Reject empty values for value-taking flags and copy every given value
    /// to the flag's other spelling.
    fn check_values(&self, matches: &mut Matches) -> Result<(), ParseError> {
        for spec in self.registry.iter() {
            let Some(found) = spec.spellings().find(|s| matches.contains(s)) else {
                continue;
            };
            let value = matches.get(found).unwrap_or_default().to_string();
            if spec.takes_value && value.is_empty() {
                return Err(ParseError::EmptyValue {
                    flag: found.to_string(),
                });
            }
            if let Some(other) = spec.other(found) {
                matches.insert(other, value);
            }
        }
        Ok(())
    }

    fn check_required(&self, matches: &Matches) -> Result<(), ParseError> {
        for spec in self.registry.required() {
            if !spec.spellings().any(|s| matches.contains(s)) {
                return Err(ParseError::MissingRequired {
                    flag: spec.display_name().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Store each declared fallback under every spelling that is still absent.
pub fn backfill_fallbacks(registry: &Registry, matches: &mut Matches) {
    for spec in registry.iter().filter(|spec| spec.has_fallback()) {
        for spelling in spec.spellings() {
            if !matches.contains(spelling) {
                tracing::debug!(spelling, fallback = %spec.fallback, "applying fallback");
                matches.insert(spelling, spec.fallback.as_str());
            }
        }
    }
}

//! The `Args` engine: declarations, parsing, accessors and usage in one owned
//! value.

use std::io::{self, Write};

use crate::convert::FromFlagValue;
use crate::error::{AccessError, AccessResult, ParseError};
use crate::matches::Matches;
use crate::parser::{Parser, backfill_fallbacks};
use crate::registry::{FlagSpec, Registry};
use crate::usage::{DEFAULT_DESC_START, DEFAULT_DESC_WIDTH, Layout, UsageText};

pub const HELP_FLAG: &str = "--help";
pub const HELP_ALIAS: &str = "-h";
pub const HELP_DESCRIPTION: &str = "Print usage and options information";

/// Engine behavior toggles and usage layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Register `--help`/`-h` during [`Args::initialize`].
    pub help_enabled: bool,
    /// Let [`Args::initialize_or_exit`] terminate the process.
    pub exit_enabled: bool,
    /// Let [`Args::initialize_or_exit`] print usage on help or error.
    pub usage_enabled: bool,
    pub desc_start: usize,
    pub desc_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            help_enabled: true,
            exit_enabled: true,
            usage_enabled: true,
            desc_start: DEFAULT_DESC_START,
            desc_width: DEFAULT_DESC_WIDTH,
        }
    }
}

impl Settings {
    pub fn layout(&self) -> Layout {
        Layout {
            desc_start: self.desc_start,
            desc_width: self.desc_width,
        }
    }
}

/// Result of a successful [`Args::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// All checks passed; values and fallbacks are available.
    Ready,
    /// `--help` or `-h` was given. Fallbacks are not applied.
    Help,
}

/// Flag declarations plus the state of the last parse.
#[derive(Debug, Clone, Default)]
pub struct Args {
    registry: Registry,
    matches: Matches,
    usage: UsageText,
    settings: Settings,
    binary: String,
    non_flags_required: usize,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Values and non-flags of the last parse.
    pub fn matches(&self) -> &Matches {
        &self.matches
    }

    /// Invocation name (token 0) of the last parse.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn non_flags_required(&self) -> usize {
        self.non_flags_required
    }

    /// Invocation name for usage text generated before any parse. The next
    /// parse replaces it with token 0.
    pub fn set_binary(&mut self, binary: impl Into<String>) -> &mut Self {
        self.binary = binary.into();
        self
    }
}

// Declarations.
impl Args {
    pub fn add_required_flag(
        &mut self,
        flag: impl Into<String>,
        alias: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Self {
        self.registry
            .add_required(FlagSpec::new(flag, alias, description, false));
        self
    }

    pub fn add_required_flag_value(
        &mut self,
        flag: impl Into<String>,
        alias: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Self {
        self.registry
            .add_required(FlagSpec::new(flag, alias, description, true));
        self
    }

    /// The fallback only applies after a successful parse, and a required
    /// flag must still be given for the parse to succeed.
    pub fn add_required_flag_value_default(
        &mut self,
        flag: impl Into<String>,
        alias: impl Into<String>,
        description: impl Into<String>,
        fallback: impl Into<String>,
    ) -> &mut Self {
        self.registry
            .add_required(FlagSpec::new(flag, alias, description, true).with_fallback(fallback));
        self
    }

    pub fn add_optional_flag(
        &mut self,
        flag: impl Into<String>,
        alias: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Self {
        self.registry
            .add_optional(FlagSpec::new(flag, alias, description, false));
        self
    }

    pub fn add_optional_flag_value(
        &mut self,
        flag: impl Into<String>,
        alias: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Self {
        self.registry
            .add_optional(FlagSpec::new(flag, alias, description, true));
        self
    }

    pub fn add_optional_flag_value_default(
        &mut self,
        flag: impl Into<String>,
        alias: impl Into<String>,
        description: impl Into<String>,
        fallback: impl Into<String>,
    ) -> &mut Self {
        self.registry
            .add_optional(FlagSpec::new(flag, alias, description, true).with_fallback(fallback));
        self
    }

    /// Require exactly `count` non-flag tokens. Zero (the default) rejects
    /// any non-flag token.
    pub fn require_non_flags(&mut self, count: usize) -> &mut Self {
        self.non_flags_required = count;
        self
    }

    pub fn set_preamble(&mut self, preamble: impl Into<String>) -> &mut Self {
        self.usage.set_preamble(preamble);
        self
    }

    pub fn set_epilogue(&mut self, epilogue: impl Into<String>) -> &mut Self {
        self.usage.set_epilogue(epilogue);
        self
    }

    pub fn set_flag_description(&mut self, flag_description: impl Into<String>) -> &mut Self {
        self.usage.set_flag_description(flag_description);
        self
    }

    pub fn disable_help(&mut self) -> &mut Self {
        self.settings.help_enabled = false;
        self
    }

    pub fn disable_exit(&mut self) -> &mut Self {
        self.settings.exit_enabled = false;
        self
    }

    pub fn disable_usage(&mut self) -> &mut Self {
        self.settings.usage_enabled = false;
        self
    }

    pub fn set_desc_start_column(&mut self, column: usize) -> &mut Self {
        self.settings.desc_start = column;
        self
    }

    pub fn set_desc_width(&mut self, width: usize) -> &mut Self {
        self.settings.desc_width = width;
        self
    }
}

// Parsing.
impl Args {
    /// Parse and validate `argv` (token 0 is the invocation name).
    ///
    /// On success fallbacks are applied. On failure the value store keeps
    /// whatever the pass had collected; do not rely on accessors then.
    pub fn parse<I, S>(&mut self, argv: I) -> Result<(), ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        self.run_pass(&argv)?;
        backfill_fallbacks(&self.registry, &mut self.matches);
        Ok(())
    }

    /// Register the built-in help flag, parse, and generate usage text.
    ///
    /// A help request wins over validation errors. Process-level reporting
    /// is left to [`Args::initialize_or_exit`].
    pub fn initialize<I, S>(&mut self, argv: I) -> Result<Outcome, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        self.register_help_flag();
        let result = self.run_pass(&argv);
        self.generate_usage();

        if self.help_requested() {
            tracing::debug!("help requested");
            return Ok(Outcome::Help);
        }
        result?;

        backfill_fallbacks(&self.registry, &mut self.matches);
        Ok(Outcome::Ready)
    }

    /// [`Args::initialize`], then print usage on help or error and exit
    /// (status 0 for help, 1 for errors) as the settings allow.
    pub fn initialize_or_exit<I, S>(&mut self, argv: I) -> Result<Outcome, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let result = self.initialize(argv);
        if result == Ok(Outcome::Ready) {
            return result;
        }

        let stdout = io::stdout();
        if let Err(err) = self.report(&result, &mut stdout.lock()) {
            tracing::warn!(error = %err, "failed to print usage");
        }

        if self.settings.exit_enabled {
            std::process::exit(if result.is_ok() { 0 } else { 1 });
        }
        result
    }

    /// Write usage, followed by the error if there is one, when usage
    /// printing is enabled and the outcome is not [`Outcome::Ready`].
    pub fn report<W: Write>(
        &self,
        result: &Result<Outcome, ParseError>,
        out: &mut W,
    ) -> io::Result<()> {
        if !self.settings.usage_enabled || matches!(result, Ok(Outcome::Ready)) {
            return Ok(());
        }
        self.print_usage(out)?;
        if let Err(err) = result {
            writeln!(out, "\nError: {err}\n")?;
        }
        out.flush()
    }

    fn run_pass(&mut self, argv: &[String]) -> Result<(), ParseError> {
        self.matches = Matches::default();
        self.binary = argv.first().cloned().unwrap_or_default();
        tracing::debug!(
            binary = %self.binary,
            tokens = argv.len().saturating_sub(1),
            declared = self.registry.total(),
            "parsing command line"
        );

        let result =
            Parser::new(&self.registry, self.non_flags_required).parse(argv, &mut self.matches);
        if let Err(err) = &result {
            tracing::debug!(error = %err, "command line rejected");
        }
        result
    }

    /// Declare the built-in optional help flag under whichever of
    /// `--help`/`-h` is still free. No-op when help is disabled.
    pub fn register_help_flag(&mut self) {
        if !self.settings.help_enabled {
            return;
        }
        let flag = if self.registry.declares(HELP_FLAG) { "" } else { HELP_FLAG };
        let alias = if self.registry.declares(HELP_ALIAS) { "" } else { HELP_ALIAS };
        if flag.is_empty() && alias.is_empty() {
            return;
        }
        self.registry
            .add_optional(FlagSpec::new(flag, alias, HELP_DESCRIPTION, false));
    }

    /// `--help` or `-h` was given and names a switch, so `-h` declared as a
    /// value flag (`--host`/`-h`) never counts.
    fn help_requested(&self) -> bool {
        self.settings.help_enabled
            && [HELP_FLAG, HELP_ALIAS].into_iter().any(|spelling| {
                self.registry
                    .find(spelling)
                    .is_some_and(|spec| !spec.takes_value)
                    && self.has(spelling)
            })
    }
}

// Usage text.
impl Args {
    /// Regenerate the preamble and flag description from the declarations.
    pub fn generate_usage(&mut self) {
        self.usage.generate(
            &self.registry,
            &self.binary,
            self.non_flags_required,
            self.settings.layout(),
        );
    }

    pub fn preamble(&self) -> &str {
        self.usage.preamble()
    }

    pub fn flag_description(&self) -> &str {
        self.usage.flag_description()
    }

    pub fn epilogue(&self) -> &str {
        self.usage.epilogue()
    }

    /// Preamble, flag description and epilogue.
    pub fn usage(&self) -> String {
        self.usage.render()
    }

    pub fn print_usage<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.usage().as_bytes())
    }
}

// Accessors.
impl Args {
    /// Convert the value stored under `flag` (exact spelling).
    pub fn get<T: FromFlagValue>(&self, flag: &str) -> AccessResult<T> {
        let raw = self.raw(flag)?;
        T::from_flag_value(flag, raw)
    }

    pub fn get_as_string(&self, flag: &str) -> AccessResult<&str> {
        self.raw(flag)
    }

    pub fn get_as_f32(&self, flag: &str) -> AccessResult<f32> {
        self.get(flag)
    }

    pub fn get_as_f64(&self, flag: &str) -> AccessResult<f64> {
        self.get(flag)
    }

    pub fn get_as_u64(&self, flag: &str) -> AccessResult<u64> {
        self.get(flag)
    }

    pub fn get_as_u32(&self, flag: &str) -> AccessResult<u32> {
        self.get(flag)
    }

    pub fn get_as_u16(&self, flag: &str) -> AccessResult<u16> {
        self.get(flag)
    }

    pub fn get_as_u8(&self, flag: &str) -> AccessResult<u8> {
        self.get(flag)
    }

    pub fn get_as_i64(&self, flag: &str) -> AccessResult<i64> {
        self.get(flag)
    }

    pub fn get_as_i32(&self, flag: &str) -> AccessResult<i32> {
        self.get(flag)
    }

    pub fn get_as_i16(&self, flag: &str) -> AccessResult<i16> {
        self.get(flag)
    }

    pub fn get_as_i8(&self, flag: &str) -> AccessResult<i8> {
        self.get(flag)
    }

    /// Whether `flag` or its declared alternative spelling was stored.
    pub fn has(&self, flag: &str) -> bool {
        if flag.is_empty() {
            return false;
        }
        self.matches.contains(flag)
            || self
                .registry
                .alternative(flag)
                .is_some_and(|other| self.matches.contains(other))
    }

    /// The other spelling of a declared flag.
    pub fn alternative(&self, flag: &str) -> Option<&str> {
        self.registry.alternative(flag)
    }

    pub fn non_flag(&self, index: usize) -> AccessResult<&str> {
        self.matches
            .non_flag(index)
            .ok_or(AccessError::PositionalOutOfRange {
                index,
                len: self.matches.non_flags().len(),
            })
    }

    pub fn non_flags(&self) -> &[String] {
        self.matches.non_flags()
    }

    fn raw(&self, flag: &str) -> AccessResult<&str> {
        if flag.is_empty() {
            return Err(AccessError::EmptyQuery);
        }
        self.matches.get(flag).ok_or_else(|| AccessError::NotFound {
            flag: flag.to_string(),
        })
    }
}

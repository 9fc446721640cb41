//! Declarative flag parsing, validation and usage rendering.
//!
//! Callers declare required and optional flags on an [`Args`] engine, hand it
//! the process command line, and then query typed values:
//!
//! ```
//! use flagwise::{Args, Outcome};
//!
//! let mut args = Args::new();
//! args.add_required_flag_value("--name", "-n", "Who to greet")
//!     .add_optional_flag("--verbose", "-v", "Print more")
//!     .disable_exit();
//!
//! let outcome = args.initialize(["greet", "--name", "Alice", "-v"]).unwrap();
//! assert_eq!(outcome, Outcome::Ready);
//! assert_eq!(args.get_as_string("-n").unwrap(), "Alice");
//! assert!(args.has("--verbose"));
//! ```
//!
//! The parse pass is a small state machine (see [`parser`]): every token is
//! classified against the declarations, unrecognized tokens are collected as
//! non-flags, and once every declared flag has been seen the remaining tokens
//! are treated as non-flags without requiring an explicit `--`.

pub mod classify;
pub mod convert;
pub mod engine;
pub mod error;
pub mod matches;
pub mod parser;
pub mod registry;
pub mod usage;

pub use engine::{Args, Outcome, Settings};
pub use error::{AccessError, AccessResult, ParseError};
pub use matches::Matches;
pub use registry::{FlagSpec, Registry};

//! JSON manifest for declaring flags outside of Rust code.
//!
//! The `flagwise` binary reads this file to validate command lines on behalf
//! of shell scripts. The model maps one-to-one onto the `Args` declaration
//! surface:
//!
//! ```json
//! {
//!   "binary": "greet",
//!   "nonFlags": 1,
//!   "epilogue": "\nExample: greet --name Alice file.txt\n",
//!   "flags": [
//!     { "flag": "--name", "alias": "-n", "description": "Who to greet",
//!       "required": true, "takesValue": true },
//!     { "flag": "--greeting", "alias": "-g", "description": "Greeting word",
//!       "takesValue": true, "default": "Hello" }
//!   ]
//! }
//! ```

use anyhow::{Context, Result, bail};
use flagwise::Args;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_MANIFEST_NAME: &str = "flagwise.json";

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Invocation name shown in usage text when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preamble: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epilogue: Option<String>,

    /// Exact number of non-flag tokens required.
    #[serde(default)]
    pub non_flags: usize,

    /// Register the built-in `--help`/`-h` flag.
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub help: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc_start: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc_width: Option<usize>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagDef>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            binary: None,
            preamble: None,
            flag_description: None,
            epilogue: None,
            non_flags: 0,
            help: true,
            desc_start: None,
            desc_width: None,
            flags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FlagDef {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub flag: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub takes_value: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl FlagDef {
    fn display_name(&self) -> &str {
        if self.flag.is_empty() {
            &self.alias
        } else {
            &self.flag
        }
    }
}

impl Manifest {
    /// Read and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let manifest: Manifest = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        manifest
            .validate()
            .with_context(|| format!("invalid manifest {}", path.display()))?;
        tracing::debug!(path = %path.display(), flags = manifest.flags.len(), "loaded manifest");
        Ok(manifest)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize manifest")
    }

    /// Reject declarations the engine cannot use.
    pub fn validate(&self) -> Result<()> {
        for (idx, def) in self.flags.iter().enumerate() {
            if def.flag.is_empty() && def.alias.is_empty() {
                bail!("flags[{idx}]: either `flag` or `alias` must be set");
            }
            if def.default.is_some() && !def.takes_value {
                bail!(
                    "flags[{idx}] ({}): `default` requires `takesValue`",
                    def.display_name()
                );
            }
            if def.default.as_deref() == Some("") {
                bail!(
                    "flags[{idx}] ({}): `default` must not be empty",
                    def.display_name()
                );
            }
        }
        Ok(())
    }

    /// Declare every flag and setting on `args`.
    pub fn apply(&self, args: &mut Args) {
        for def in &self.flags {
            let (flag, alias, desc) = (def.flag.as_str(), def.alias.as_str(), def.description.as_str());
            match (def.required, def.takes_value, def.default.as_deref()) {
                (true, false, _) => args.add_required_flag(flag, alias, desc),
                (true, true, None) => args.add_required_flag_value(flag, alias, desc),
                (true, true, Some(fallback)) => {
                    args.add_required_flag_value_default(flag, alias, desc, fallback)
                }
                (false, false, _) => args.add_optional_flag(flag, alias, desc),
                (false, true, None) => args.add_optional_flag_value(flag, alias, desc),
                (false, true, Some(fallback)) => {
                    args.add_optional_flag_value_default(flag, alias, desc, fallback)
                }
            };
        }

        args.require_non_flags(self.non_flags);
        if !self.help {
            args.disable_help();
        }
        if let Some(column) = self.desc_start {
            args.set_desc_start_column(column);
        }
        if let Some(width) = self.desc_width {
            args.set_desc_width(width);
        }
        if let Some(preamble) = &self.preamble {
            args.set_preamble(preamble.as_str());
        }
        if let Some(flag_description) = &self.flag_description {
            args.set_flag_description(flag_description.as_str());
        }
        if let Some(epilogue) = &self.epilogue {
            args.set_epilogue(epilogue.as_str());
        }
    }

    /// A fresh engine with this manifest applied.
    pub fn to_args(&self) -> Args {
        let mut args = Args::new();
        self.apply(&mut args);
        args
    }

    /// Manifest written by `flagwise init`.
    pub fn example() -> Self {
        Self {
            binary: Some("greet".to_string()),
            epilogue: Some("\nExample: greet --name Alice notes.txt\n".to_string()),
            non_flags: 1,
            flags: vec![
                FlagDef {
                    flag: "--name".to_string(),
                    alias: "-n".to_string(),
                    description: "Who to greet".to_string(),
                    required: true,
                    takes_value: true,
                    default: None,
                },
                FlagDef {
                    flag: "--greeting".to_string(),
                    alias: "-g".to_string(),
                    description: "Greeting word placed before the name".to_string(),
                    required: false,
                    takes_value: true,
                    default: Some("Hello".to_string()),
                },
                FlagDef {
                    flag: "--verbose".to_string(),
                    alias: "-v".to_string(),
                    description: "Print every resolved flag, including fallbacks".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }
}

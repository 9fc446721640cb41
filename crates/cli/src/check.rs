use flagwise::{Args, Outcome};
use flagwise_manifest::Manifest;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ready,
    Help,
    Error,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub binary: String,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Resolved values keyed by each flag's primary spelling, in declaration order.
    pub flags: IndexMap<String, String>,
    pub non_flags: Vec<String>,
    #[serde(skip)]
    pub usage: String,
}

/// Run `argv` (token 0 is the invocation name) through the manifest's
/// declarations without printing or exiting.
pub fn check_command_line(manifest: &Manifest, argv: &[String]) -> CheckReport {
    let mut args = manifest.to_args();
    args.disable_exit().disable_usage();

    let result = args.initialize(argv.iter().cloned());
    let (status, error) = match result {
        Ok(Outcome::Ready) => (CheckStatus::Ready, None),
        Ok(Outcome::Help) => (CheckStatus::Help, None),
        Err(err) => (CheckStatus::Error, Some(err.to_string())),
    };
    tracing::debug!(?status, "checked command line");

    CheckReport {
        binary: args.binary().to_string(),
        status,
        error,
        flags: resolved_flags(&args),
        non_flags: args.non_flags().to_vec(),
        usage: args.usage(),
    }
}

fn resolved_flags(args: &Args) -> IndexMap<String, String> {
    let mut flags = IndexMap::new();
    for spec in args.registry().iter() {
        let name = spec.display_name();
        if flags.contains_key(name) {
            continue;
        }
        if let Ok(value) = args.get_as_string(name) {
            flags.insert(name.to_string(), value.to_string());
        }
    }
    flags
}

impl CheckReport {
    /// `flag=value` lines followed by one line per non-flag, for `eval`-free
    /// consumption with `while read` loops.
    pub fn to_lines(&self) -> String {
        let mut out = String::new();
        for (flag, value) in &self.flags {
            out.push_str(&format!("{flag}={value}\n"));
        }
        for token in &self.non_flags {
            out.push_str(token);
            out.push('\n');
        }
        out
    }
}

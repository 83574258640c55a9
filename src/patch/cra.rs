//! Create React App patching.
//!
//! CRA reads PUBLIC_URL from env files at build time; the highest
//! precedence production file gets the override.

use super::ConfigPatcher;
use crate::error::Result;

const ENV_FILE: &str = ".env.production.local";
const PUBLIC_URL_VAR: &str = "PUBLIC_URL";

pub(super) fn apply(patcher: &mut ConfigPatcher, base_path: &str) -> Result<()> {
    let contents = match patcher.read_existing(ENV_FILE)? {
        Some(original) => set_env_var(&original, PUBLIC_URL_VAR, base_path),
        None => format!("{PUBLIC_URL_VAR}={base_path}\n"),
    };
    patcher.write_patched(ENV_FILE, &contents)
}

/// Replace the first assignment of `name`, drop later duplicates, and
/// append the assignment when none exists. Other lines pass through.
fn set_env_var(text: &str, name: &str, value: &str) -> String {
    let mut lines = Vec::new();
    let mut replaced = false;

    for line in text.lines() {
        if is_assignment(line, name) {
            if !replaced {
                lines.push(format!("{name}={value}"));
                replaced = true;
            }
            continue;
        }
        lines.push(line.to_string());
    }

    if !replaced {
        lines.push(format!("{name}={value}"));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn is_assignment(line: &str, name: &str) -> bool {
    match line.trim_start().strip_prefix(name) {
        Some(rest) => rest.trim_start().starts_with('='),
        None => false,
    }
}

/// Platform-specific helpers for Windows compatibility.
use std::process::Command;

/// Resolve an npm-installed CLI command name for the current platform.
///
/// On Windows, npm installs create `.cmd` shims (e.g., `npm.cmd`,
/// `npx.cmd`) which `Command::new` cannot find — it only searches for
/// `.exe` files. Routing through `cmd /C` makes the command resolve
/// correctly.
///
/// Commands that ship as native `.exe` (like `git`) should NOT use this —
/// call `Command::new("git")` directly.
pub fn npm_cmd(name: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", name]);
        cmd
    } else {
        Command::new(name)
    }
}

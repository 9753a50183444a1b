//! Child process lifecycle
//!
//! Commands are opaque shell command lines; the supervisor never inspects
//! the server child's stdout, stderr or exit code.

use std::process::{Child, Command};

use crate::error::{DevloopError, DevloopResult};

/// Build a platform shell invocation for a command line.
fn shell_command(command: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }
}

fn spawn(command: &str) -> DevloopResult<Child> {
    shell_command(command)
        .spawn()
        .map_err(|source| DevloopError::Spawn {
            command: command.to_string(),
            source,
        })
}

/// Run a command to completion, returning whether it exited successfully.
/// Spawn failures propagate; a non-zero exit does not.
pub fn run_to_completion(command: &str) -> DevloopResult<bool> {
    let mut child = spawn(command)?;
    let status = child.wait()?;
    Ok(status.success())
}

/// Owns the supervised server child process.
///
/// Invariant: exactly one live child between any two consecutive restarts.
pub struct ProcessHandle {
    child: Child,
}

impl ProcessHandle {
    /// Spawn `command` and adopt its child; does not wait for readiness.
    pub fn start(command: &str) -> DevloopResult<Self> {
        Ok(Self {
            child: spawn(command)?,
        })
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Signal the current child, then spawn and adopt a replacement.
    ///
    /// The old child's exit is not awaited before the new spawn; a brief
    /// window where both are alive is tolerated for a dev server. The old
    /// child is reaped on a detached thread so repeated restarts don't
    /// accumulate zombies.
    pub fn replace(&mut self, command: &str) -> DevloopResult<()> {
        let _ = self.child.kill();
        let new = spawn(command)?;
        let mut old = std::mem::replace(&mut self.child, new);
        std::thread::spawn(move || {
            let _ = old.wait();
        });
        Ok(())
    }

    /// Terminate the child and wait for it to exit. Shutdown path only.
    pub fn terminate(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

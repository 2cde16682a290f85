use std::io;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::process::{Child, Command};

use libc::{SIG_DFL, SIGINT, SIGQUIT, signal};

use crate::env::EnvStore;
use crate::parse::Argv;

/// How a foreground child reached a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Normal exit with the given status code.
    Exited(i32),
    /// Killed by an uncaught signal.
    Signaled(i32),
}

/// A spawned foreground child, waiting to be reaped.
#[derive(Debug)]
pub struct Launched {
    child: Child,
}

/// Launch an external program from an argument vector.
///
/// The child gets the argv tail as its arguments and a copy of the store as
/// its entire environment; later store mutations do not reach it. The shell
/// ignores SIGINT/SIGQUIT for itself, so the child resets them to the
/// default disposition before exec — an interactive interrupt lands on the
/// foreground program, never on the interpreter loop.
///
/// Errors out of here cover both failure to create the process (resource
/// exhaustion) and failure to load the program image (not found, not
/// executable); either way no child is left behind and the caller's state
/// is untouched.
pub fn spawn(argv: &Argv, env: &EnvStore) -> io::Result<Launched> {
    let name = argv
        .name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty argument vector"))?;

    let mut cmd = Command::new(name);
    cmd.args(argv.args()).env_clear().envs(env.snapshot());

    unsafe {
        cmd.pre_exec(|| {
            signal(SIGINT, SIG_DFL);
            signal(SIGQUIT, SIG_DFL);
            Ok(())
        });
    }

    let child = cmd.spawn()?;
    Ok(Launched { child })
}

impl Launched {
    /// Block until the child reaches a terminal state.
    ///
    /// A stopped (suspended) child does not satisfy the wait; only a normal
    /// exit or death by signal does.
    pub fn wait(mut self) -> io::Result<Termination> {
        let status = self.child.wait()?;
        if let Some(code) = status.code() {
            Ok(Termination::Exited(code))
        } else if let Some(signo) = status.signal() {
            Ok(Termination::Signaled(signo))
        } else {
            // wait() only returns for terminal states, so one of the two
            // branches above always matches on Unix.
            Err(io::Error::other("child neither exited nor was signaled"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::tokenize;

    #[test]
    fn runs_a_real_program_to_exit() {
        let env = EnvStore::from_process();
        let launched = spawn(&tokenize("true"), &env).unwrap();
        assert_eq!(launched.wait().unwrap(), Termination::Exited(0));
    }

    #[test]
    fn reports_nonzero_exit_codes() {
        let env = EnvStore::from_process();
        let launched = spawn(&tokenize("false"), &env).unwrap();
        assert_eq!(launched.wait().unwrap(), Termination::Exited(1));
    }

    #[test]
    fn missing_program_fails_to_spawn() {
        let env = EnvStore::from_process();
        let err = spawn(&tokenize("definitely-not-a-real-command"), &env).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn empty_argv_is_rejected() {
        let env = EnvStore::from_process();
        assert!(spawn(&tokenize("   "), &env).is_err());
    }
}

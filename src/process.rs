//! Process module.
//!
//! This module contains a cross platform helper to run shell
//! commands, used to retrieve secrets from password managers.

use log::debug;
use std::{
    env, io,
    process::{Command, ExitStatus},
    result, string,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot run command {1:?}")]
    RunCmdError(#[source] io::Error, String),
    #[error("command {1:?} exited with {0}")]
    CmdExitError(ExitStatus, String),
    #[error("cannot parse output of command {1:?}")]
    ParseCmdOutputError(#[source] string::FromUtf8Error, String),
}

pub type Result<T> = result::Result<T, Error>;

/// Runs the given command through the system shell and returns its
/// standard output as UTF-8 string.
pub fn run(cmd: &str) -> Result<String> {
    debug!("running command: {}", cmd);

    let windows = cfg!(target_os = "windows")
        && env::var("MSYSTEM")
            .map(|env| !env.starts_with("MINGW"))
            .unwrap_or_default();

    let output = if windows {
        Command::new("cmd").args(["/C", cmd]).output()
    } else {
        Command::new("sh").arg("-c").arg(cmd).output()
    }
    .map_err(|err| Error::RunCmdError(err, cmd.to_owned()))?;

    if !output.status.success() {
        return Err(Error::CmdExitError(output.status, cmd.to_owned()));
    }

    String::from_utf8(output.stdout).map_err(|err| Error::ParseCmdOutputError(err, cmd.to_owned()))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn run_returns_stdout() {
        assert_eq!("password\n", run("echo 'password'").unwrap());
    }

    #[test]
    fn run_supports_pipes() {
        assert_eq!("PASSWORD\n", run("echo password | tr a-z A-Z").unwrap());
    }

    #[test]
    fn run_fails_on_non_zero_exit() {
        assert!(matches!(run("exit 3"), Err(Error::CmdExitError(_, _))));
    }
}

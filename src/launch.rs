//! Definition of [`Launcher`], which starts one OS process per rank of the group.

use std::{
    ffi::OsString,
    process::{Child, Command, ExitStatus},
};

use crate::{
    common::{error::LaunchError, Rank},
    real::config::{BASE_PORT_VAR, DEFAULT_BASE_PORT, DEFAULT_HOST, HOST_VAR, RANK_VAR, SIZE_VAR},
};

/// Usage line of the launcher binary.
pub const USAGE: &str =
    "Usage: pingpong-launch -n <N> [--host <HOST>] [--base-port <PORT>] <program> [args...]";

/// Starts `np` copies of the program, telling every copy its rank
/// and the layout of the group through environment variables.
#[derive(Clone, Debug, PartialEq)]
pub struct Launcher {
    /// Number of processes.
    pub np: u32,
    /// Host every rank listens on.
    pub host: String,
    /// Port of rank 0, rank `r` listens on `base_port + r`.
    pub base_port: u16,
    /// Program to start.
    pub program: OsString,
    /// Arguments passed to every copy.
    pub args: Vec<OsString>,
}

impl Launcher {
    /// Creates launcher with default host and base port.
    pub fn new(np: u32, program: impl Into<OsString>) -> Self {
        Self {
            np,
            host: DEFAULT_HOST.to_owned(),
            base_port: DEFAULT_BASE_PORT,
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Parses command line arguments, not including the name of the launcher itself.
    pub fn from_args<I, S>(args: I) -> Result<Self, LaunchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let usage = |info: &str| LaunchError::Usage(format!("{}\n{}", info, USAGE));

        let mut args = args.into_iter().map(Into::into);
        let mut np: Option<u32> = None;
        let mut host = DEFAULT_HOST.to_owned();
        let mut base_port = DEFAULT_BASE_PORT;

        let program = loop {
            let Some(arg) = args.next() else {
                return Err(usage("program is not specified"));
            };

            let mut value = |name: &str| -> Result<String, LaunchError> {
                args.next()
                    .and_then(|v| v.into_string().ok())
                    .ok_or_else(|| usage(&format!("option {} needs a value", name)))
            };

            match arg.to_str() {
                Some("-n") | Some("-np") => {
                    let v = value("-n")?;
                    np = Some(
                        v.parse()
                            .map_err(|_| usage(&format!("bad number of processes '{}'", v)))?,
                    );
                }
                Some("--host") => host = value("--host")?,
                Some("--base-port") => {
                    let v = value("--base-port")?;
                    base_port = v
                        .parse()
                        .map_err(|_| usage(&format!("bad base port '{}'", v)))?;
                }
                Some(other) if other.starts_with('-') => {
                    return Err(usage(&format!("unknown option '{}'", other)))
                }
                _ => break arg,
            }
        };

        let np = np.ok_or_else(|| usage("number of processes is not specified"))?;
        if np == 0 {
            return Err(usage("number of processes must be positive"));
        }
        if u32::from(base_port) + np > u32::from(u16::MAX) + 1 {
            return Err(usage(&format!(
                "ports {}..{} do not fit",
                base_port,
                u32::from(base_port) + np
            )));
        }

        Ok(Self {
            np,
            host,
            base_port,
            program,
            args: args.collect(),
        })
    }

    /// Builds command which starts the process with specified rank.
    pub fn command(&self, rank: Rank) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .env(RANK_VAR, rank.to_string())
            .env(SIZE_VAR, self.np.to_string())
            .env(HOST_VAR, &self.host)
            .env(BASE_PORT_VAR, self.base_port.to_string());
        command
    }

    /// Starts all processes, waits for them and returns the exit code of the group:
    /// the first non-zero child status in rank order, or zero.
    ///
    /// If some process can not be started, already started ones are killed.
    pub fn run(&self) -> Result<i32, LaunchError> {
        let mut children: Vec<Child> = Vec::with_capacity(self.np as usize);

        for rank in 0..self.np {
            match self.command(rank).spawn() {
                Ok(child) => {
                    log::debug!("started process {} with pid {}", rank, child.id());
                    children.push(child);
                }
                Err(e) => {
                    for child in children.iter_mut() {
                        let _ = child.kill();
                        let _ = child.wait();
                    }
                    return Err(LaunchError::Spawn {
                        rank,
                        info: e.to_string(),
                    });
                }
            }
        }

        let mut code = 0;
        for (rank, mut child) in (0..).zip(children) {
            let status = child.wait().map_err(|e| LaunchError::Spawn {
                rank,
                info: e.to_string(),
            })?;
            let child_code = exit_code(&status);
            if child_code != 0 {
                log::warn!("process {} exited with {}", rank, status);
                if code == 0 {
                    code = child_code;
                }
            }
        }

        Ok(code)
    }
}

/// Exit code of the child, processes killed by a signal count as failed.
fn exit_code(status: &ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None if status.success() => 0,
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use crate::{
        common::error::LaunchError,
        real::config::{BASE_PORT_VAR, HOST_VAR, RANK_VAR, SIZE_VAR},
    };

    use super::Launcher;

    fn env_of(command: &std::process::Command, var: &str) -> Option<String> {
        command
            .get_envs()
            .find(|(k, _)| *k == var)
            .and_then(|(_, v)| v)
            .map(|v| v.to_string_lossy().into_owned())
    }

    #[test]
    fn parse_full_command_line() {
        let launcher = Launcher::from_args([
            "-n",
            "2",
            "--host",
            "localhost",
            "--base-port",
            "12000",
            "./ping-pong",
            "--flag",
            "-x",
        ])
        .unwrap();

        assert_eq!(launcher.np, 2);
        assert_eq!(launcher.host, "localhost");
        assert_eq!(launcher.base_port, 12000);
        assert_eq!(launcher.program, OsString::from("./ping-pong"));
        assert_eq!(
            launcher.args,
            vec![OsString::from("--flag"), OsString::from("-x")]
        );
    }

    #[test]
    fn parse_uses_defaults() {
        let launcher = Launcher::from_args(["-n", "3", "prog"]).unwrap();
        assert_eq!(launcher, Launcher::new(3, "prog"));
    }

    #[test]
    fn parse_errors() {
        let is_usage = |r: Result<Launcher, LaunchError>| matches!(r, Err(LaunchError::Usage(_)));

        assert!(is_usage(Launcher::from_args(Vec::<String>::new())));
        assert!(is_usage(Launcher::from_args(["prog"])));
        assert!(is_usage(Launcher::from_args(["-n"])));
        assert!(is_usage(Launcher::from_args(["-n", "two", "prog"])));
        assert!(is_usage(Launcher::from_args(["-n", "0", "prog"])));
        assert!(is_usage(Launcher::from_args(["-n", "2"])));
        assert!(is_usage(Launcher::from_args(["-n", "2", "--verbose", "prog"])));
        assert!(is_usage(Launcher::from_args([
            "-n",
            "2",
            "--base-port",
            "65535",
            "prog"
        ])));
    }

    #[test]
    fn command_sets_environment() {
        let mut launcher = Launcher::new(2, "prog");
        launcher.base_port = 13000;
        launcher.args = vec!["a".into()];

        let command = launcher.command(1);
        assert_eq!(command.get_program(), "prog");
        assert_eq!(command.get_args().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(env_of(&command, RANK_VAR), Some("1".to_owned()));
        assert_eq!(env_of(&command, SIZE_VAR), Some("2".to_owned()));
        assert_eq!(env_of(&command, HOST_VAR), Some("127.0.0.1".to_owned()));
        assert_eq!(env_of(&command, BASE_PORT_VAR), Some("13000".to_owned()));
    }

    #[cfg(unix)]
    #[test]
    fn run_reports_first_failure() {
        let mut launcher = Launcher::new(3, "sh");
        launcher.args = vec!["-c".into(), format!("exit ${}", RANK_VAR).into()];
        assert_eq!(launcher.run(), Ok(1));

        let mut launcher = Launcher::new(2, "sh");
        launcher.args = vec!["-c".into(), "exit 0".into()];
        assert_eq!(launcher.run(), Ok(0));
    }

    #[test]
    fn run_reports_missing_program() {
        let launcher = Launcher::new(2, "/nonexistent/pingpong-program");
        assert!(matches!(
            launcher.run(),
            Err(LaunchError::Spawn { rank: 0, .. })
        ));
    }
}

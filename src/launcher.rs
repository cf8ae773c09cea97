use crate::model::THEME_SELECTOR_EXEC;
use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("empty launch command")]
    Empty,
    #[error("{0:?} is not a launchable command")]
    Reserved(String),
    #[error("failed to launch application {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Starts a program without waiting for it.
pub trait Spawner {
    fn spawn_detached(&mut self, program: &str, args: &[&str]) -> io::Result<()>;
}

/// Spawns into its own process group with null stdio; the child is never
/// waited on.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedSpawner;

impl Spawner for DetachedSpawner {
    fn spawn_detached(&mut self, program: &str, args: &[&str]) -> io::Result<()> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0);

        command.spawn().map(drop)
    }
}

/// Splits `exec` into program and arguments, dropping `%` field codes.
pub fn parse_command(exec: &str) -> Result<(&str, Vec<&str>), LaunchError> {
    if exec.is_empty() {
        return Err(LaunchError::Empty);
    }
    if exec == THEME_SELECTOR_EXEC {
        return Err(LaunchError::Reserved(exec.to_string()));
    }

    let mut tokens = exec.split_whitespace();
    let program = tokens.next().ok_or(LaunchError::Empty)?;
    let args = tokens.filter(|arg| !arg.starts_with('%')).collect();
    Ok((program, args))
}

pub struct Launcher<P> {
    spawner: P,
}

impl<P: Spawner> Launcher<P> {
    pub fn new(spawner: P) -> Self {
        Self { spawner }
    }

    pub fn spawner(&self) -> &P {
        &self.spawner
    }

    pub fn launch(&mut self, exec: &str) -> Result<(), LaunchError> {
        let (program, args) = parse_command(exec)?;
        self.spawner
            .spawn_detached(program, &args)
            .map_err(|source| LaunchError::Spawn {
                command: exec.to_string(),
                source,
            })?;
        log::info!("Launched {:?}", exec);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSpawner;
    use super::*;

    #[test]
    fn field_codes_are_dropped() {
        let mut launcher = Launcher::new(RecordingSpawner::default());
        launcher.launch("firefox %u").unwrap();
        assert_eq!(launcher.spawner().calls, vec![("firefox".to_string(), vec![])]);
    }

    #[test]
    fn keeps_plain_arguments_in_order() {
        let (program, args) = parse_command("  env  FOO=1 %F app --flag %i ").unwrap();
        assert_eq!(program, "env");
        assert_eq!(args, vec!["FOO=1", "app", "--flag"]);
    }

    #[test]
    fn empty_reserved_and_blank_commands_never_spawn() {
        let mut launcher = Launcher::new(RecordingSpawner::default());

        assert!(matches!(launcher.launch(""), Err(LaunchError::Empty)));
        assert!(matches!(launcher.launch("theme_selector"), Err(LaunchError::Reserved(_))));
        assert!(matches!(launcher.launch("   "), Err(LaunchError::Empty)));
        assert!(launcher.spawner().calls.is_empty());
    }

    #[test]
    fn detached_spawner_returns_without_waiting() {
        let mut spawner = DetachedSpawner;
        spawner.spawn_detached("sleep", &["5"]).unwrap();
    }

    #[test]
    fn detached_spawner_reports_missing_program() {
        let mut launcher = Launcher::new(DetachedSpawner);
        let err = launcher.launch("hotspot-no-such-program-xyz --flag").unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { .. }));
    }

    #[test]
    fn spawn_failure_reports_original_command() {
        let mut launcher = Launcher::new(RecordingSpawner {
            fail: true,
            ..Default::default()
        });

        let err = launcher.launch("missing-app --x %U").unwrap_err();
        match err {
            LaunchError::Spawn { command, .. } => assert_eq!(command, "missing-app --x %U"),
            other => panic!("unexpected error: {other}"),
        }
    }
}

use crate::error::HostError;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::process::Command;

/// The native capabilities a running program may use.
pub trait Host {
    /// Runs `command` through the platform shell and returns its exit status.
    fn execute(&mut self, command: &str) -> Result<i32, HostError>;

    /// Writes `text` followed by a newline to the program's output.
    fn write_line(&mut self, text: &str) -> Result<(), HostError>;

    /// Reads one line of input, without its line terminator.
    fn read_line(&mut self) -> Result<String, HostError>;
}

fn strip_newline(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

/// Host backed by the real shell, standard output and standard input.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl SystemHost {
    pub fn new() -> Self {
        Self
    }

    fn shell_command(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        }
    }
}

impl Host for SystemHost {
    fn execute(&mut self, command: &str) -> Result<i32, HostError> {
        if command.trim().is_empty() {
            return Err(HostError::EmptyCommand);
        }
        log::debug!("executing shell command: {command}");
        let status = Self::shell_command(command)
            .status()
            .map_err(|source| HostError::Spawn {
                command: command.to_string(),
                source,
            })?;
        log::debug!("shell command finished with {status}");
        status
            .code()
            .ok_or_else(|| HostError::Terminated(command.to_string()))
    }

    fn write_line(&mut self, text: &str) -> Result<(), HostError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{text}")?;
        out.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, HostError> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(HostError::EndOfInput);
        }
        Ok(strip_newline(line))
    }
}

/// In-memory host for tests and embedding.
///
/// Commands are recorded instead of run and answered with a fixed status.
#[derive(Debug, Default, Clone)]
pub struct BufferedHost {
    input: VecDeque<String>,
    output: Vec<String>,
    commands: Vec<String>,
    status: i32,
}

impl BufferedHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues lines to be returned by [`Host::read_line`].
    pub fn with_input<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Status returned for every executed command.
    pub fn with_status(mut self, status: i32) -> Self {
        self.status = status;
        self
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

impl Host for BufferedHost {
    fn execute(&mut self, command: &str) -> Result<i32, HostError> {
        if command.trim().is_empty() {
            return Err(HostError::EmptyCommand);
        }
        self.commands.push(command.to_string());
        Ok(self.status)
    }

    fn write_line(&mut self, text: &str) -> Result<(), HostError> {
        self.output.push(text.to_string());
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, HostError> {
        self.input.pop_front().ok_or(HostError::EndOfInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_empty_command_rejected() {
        init_logger();
        assert!(matches!(SystemHost::new().execute(""), Err(HostError::EmptyCommand)));
        assert!(matches!(SystemHost::new().execute("   "), Err(HostError::EmptyCommand)));
        assert!(matches!(BufferedHost::new().execute(""), Err(HostError::EmptyCommand)));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_host_returns_exit_status() {
        init_logger();
        let mut host = SystemHost::new();
        assert_eq!(host.execute("true").unwrap(), 0);
        assert_eq!(host.execute("exit 3").unwrap(), 3);
    }

    #[test]
    fn test_buffered_host_round_trip() {
        let mut host = BufferedHost::new().with_input(["first", "second"]).with_status(7);
        assert_eq!(host.read_line().unwrap(), "first");
        host.write_line("hello").unwrap();
        assert_eq!(host.execute("make all").unwrap(), 7);
        assert_eq!(host.read_line().unwrap(), "second");
        assert!(matches!(host.read_line(), Err(HostError::EndOfInput)));

        assert_eq!(host.output(), ["hello".to_string()]);
        assert_eq!(host.commands(), ["make all".to_string()]);
    }

    #[test]
    fn test_host_is_object_safe() {
        let mut hosts: Vec<Box<dyn Host>> = vec![Box::new(BufferedHost::new())];
        for host in &mut hosts {
            host.write_line("ok").unwrap();
        }
    }

    #[test]
    fn test_strip_newline() {
        assert_eq!(strip_newline("abc\r\n".to_string()), "abc");
        assert_eq!(strip_newline("abc\n".to_string()), "abc");
        assert_eq!(strip_newline("abc".to_string()), "abc");
    }
}

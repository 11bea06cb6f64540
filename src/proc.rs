use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("{program} exited without success: {status}")]
pub struct ProcessExitError {
    program: String,
    status: std::process::ExitStatus,
}

#[derive(Error, Debug)]
#[error("pipe chain failed: {summary}")]
pub struct ChainExitError {
    summary: String,
}

/// A fully-specified external command: the program name plus its ordered
/// argument list. Building a spec has no side effects; execution is a
/// separate, explicit step.
#[derive(Debug, Clone)]
pub struct ProcessSpec {
    program: String,
    args: Vec<OsString>,
}

impl ProcessSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_os_string());
        }
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Render the spec the way a shell would show it, for logs and errors.
    pub fn render(&self) -> String {
        let mut rendered = self.program.clone();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(&arg.to_string_lossy());
        }
        rendered
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// Run the command to completion with its output streams captured.
    ///
    /// On success the captured streams are discarded (surfaced at debug
    /// level only); on a non-success exit the captured stderr is attached
    /// to the returned error.
    pub fn run(&self) -> Result<()> {
        debug!("running: {}", self.render());

        let output = self
            .command()
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to start {}", self.program))?;

        if !output.stderr.is_empty() {
            debug!(
                "{} stderr: {}",
                self.program,
                String::from_utf8_lossy(&output.stderr).trim_end()
            );
        }

        match output.status.success() {
            true => Ok(()),
            false => Err(ProcessExitError {
                program: self.program.clone(),
                status: output.status,
            })
            .with_context(|| {
                format!(
                    "stderr: {}",
                    String::from_utf8_lossy(&output.stderr).trim_end()
                )
            }),
        }
    }
}

/// An ordered sequence of specs executed concurrently, each process's
/// standard output wired into the next one's standard input.
#[derive(Debug, Clone, Default)]
pub struct PipeChain {
    specs: Vec<ProcessSpec>,
}

impl PipeChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, spec: ProcessSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn specs(&self) -> &[ProcessSpec] {
        &self.specs
    }

    pub fn render(&self) -> String {
        self.specs
            .iter()
            .map(ProcessSpec::render)
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Run the whole chain, streaming `input` (or nothing) into the first
    /// process and the last process's standard output into `output`.
    ///
    /// Every member is waited on before the call returns; if any of them
    /// exits without success the chain fails with one aggregated error
    /// naming each failed member.
    pub fn run(&self, input: Option<&Path>, output: &Path, stream_stderr: bool) -> Result<()> {
        assert!(!self.specs.is_empty(), "empty pipe chain");
        debug!("running: {}", self.render());

        let mut upstream: Stdio = match input {
            Some(path) => File::open(path)
                .with_context(|| format!("failed to open {}", path.to_string_lossy()))?
                .into(),
            None => Stdio::null(),
        };

        let last = self.specs.len() - 1;
        let mut children = Vec::with_capacity(self.specs.len());
        for (idx, spec) in self.specs.iter().enumerate() {
            let stdout: Stdio = if idx == last {
                File::create(output)
                    .with_context(|| format!("failed to create {}", output.to_string_lossy()))?
                    .into()
            } else {
                Stdio::piped()
            };
            let stderr = match stream_stderr {
                true => Stdio::inherit(),
                false => Stdio::null(),
            };

            let mut child = spec
                .command()
                .stdin(upstream)
                .stdout(stdout)
                .stderr(stderr)
                .spawn()
                .with_context(|| format!("failed to start {}", spec.program()))?;

            upstream = match child.stdout.take() {
                Some(pipe) => pipe.into(),
                // only the last member has no piped stdout, and nothing reads this
                None => Stdio::null(),
            };
            children.push(child);
        }

        let mut failures = vec![];
        for (spec, mut child) in self.specs.iter().zip(children) {
            let status = child
                .wait()
                .with_context(|| format!("failed to wait on {}", spec.program()))?;
            if !status.success() {
                failures.push(format!("{} ({status})", spec.program()));
            }
        }

        match failures.is_empty() {
            true => Ok(()),
            false => Err(ChainExitError {
                summary: failures.join(", "),
            }
            .into()),
        }
    }
}

//! Type-safe Git command builder for consistent command execution
//!
//! Fluent construction of `git` invocations with uniform logging, optional
//! timeouts and error mapping onto [`GitLinkError`] variants.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::constants::ORIGIN_REMOTE;
use crate::core::GitLinkError;
use crate::utils::platform::get_git_command;

/// Builder for constructing and executing Git commands.
///
/// # Examples
///
/// ```rust,no_run
/// use gitlink_cli::git::command_builder::GitCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// let url = GitCommand::remote_url()
///     .current_dir("/path/to/repo")
///     .with_context("lib-a")
///     .execute_stdout()
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// # Default Configuration
///
/// - **Timeout**: none; a hung git process hangs only the caller's task
/// - **Output capture**: enabled
/// - **Working directory**: passed to git with `-C` when set
/// - **Environment**: inherited, with `GIT_TERMINAL_PROMPT=0` so a credential
///   prompt fails the command instead of blocking on stdin
pub struct GitCommand {
    /// Command arguments (e.g. `["clone", url, path]`)
    args: Vec<String>,

    /// Directory passed to git via `-C`
    current_dir: Option<PathBuf>,

    /// Environment variables to set for the git process
    env_vars: Vec<(String, String)>,

    /// Maximum duration to wait for completion (None = wait forever)
    timeout_duration: Option<Duration>,

    /// Optional context (entry name) for log lines
    context: Option<String>,

    /// For clone commands, the URL for error messages
    clone_url: Option<String>,
}

impl Default for GitCommand {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            current_dir: None,
            env_vars: vec![("GIT_TERMINAL_PROMPT".to_string(), "0".to_string())],
            timeout_duration: None,
            context: None,
            clone_url: None,
        }
    }
}

impl GitCommand {
    /// Creates a new Git command builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs git against `dir` (via `-C`), independent of the process cwd.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Adds a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Adds multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Adds an environment variable for this invocation only.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    /// Set a timeout for the command (None for no timeout).
    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    /// Set a context for logging (typically the manifest entry name).
    ///
    /// Entries resolve concurrently, so the context is what tells their log
    /// lines apart:
    /// ```text
    /// (lib-a) Executing command: git -C /work/lib-a remote get-url origin
    /// ```
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    fn log_prefix(&self) -> String {
        self.context.as_ref().map(|ctx| format!("({ctx}) ")).unwrap_or_default()
    }

    /// Execute the command and return the output
    pub async fn execute(self) -> Result<GitCommandOutput> {
        let start = std::time::Instant::now();
        let git_command = get_git_command();
        let prefix = self.log_prefix();
        let mut cmd = Command::new(git_command);

        let mut full_args = Vec::new();
        if let Some(ref dir) = self.current_dir {
            full_args.push("-C".to_string());
            full_args.push(dir.display().to_string());
        }
        full_args.extend(self.args.iter().cloned());
        let operation = self.args.first().cloned().unwrap_or_else(|| "unknown".to_string());

        cmd.args(&full_args);
        tracing::debug!(
            target: "git",
            "{}Executing command: {} {}",
            prefix,
            git_command,
            full_args.join(" ")
        );

        for (key, value) in &self.env_vars {
            tracing::trace!(target: "git", "Setting env var: {}={}", key, value);
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let output_future = cmd.output();
        let output = if let Some(duration) = self.timeout_duration {
            if let Ok(result) = timeout(duration, output_future).await {
                result.context(format!("Failed to execute git {}", full_args.join(" ")))?
            } else {
                tracing::warn!(
                    target: "git",
                    "{}Command timed out after {} seconds: git {}",
                    prefix,
                    duration.as_secs(),
                    full_args.join(" ")
                );
                return Err(self.map_failure(
                    &operation,
                    format!(
                        "Git command timed out after {} seconds. Try running the command manually: git {}",
                        duration.as_secs(),
                        full_args.join(" ")
                    ),
                )
                .into());
            }
        } else {
            output_future.await.context(format!("Failed to execute git {}", full_args.join(" ")))?
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);

            tracing::debug!(
                target: "git",
                "{}Command failed with exit code: {:?}",
                prefix,
                output.status.code()
            );
            let message = if stderr.trim().is_empty() {
                stdout.to_string()
            } else {
                stderr.to_string()
            };
            if !message.trim().is_empty() {
                tracing::debug!(target: "git", "{}Error: {}", prefix, message.trim());
            }

            return Err(self.map_failure(&operation, message).into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stdout.trim().is_empty() {
            tracing::trace!(target: "git", "{}{}", prefix, stdout.trim());
        }
        if !stderr.trim().is_empty() {
            tracing::trace!(target: "git", "{}{}", prefix, stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(target: "git::perf", "{}Git {} took {:.2}s", prefix, operation, elapsed.as_secs_f64());
        } else if elapsed.as_millis() > 100 {
            tracing::debug!(target: "git::perf", "{}Git {} took {}ms", prefix, operation, elapsed.as_millis());
        }

        Ok(GitCommandOutput {
            stdout,
            stderr,
        })
    }

    /// Translate a failed invocation into the matching error kind.
    fn map_failure(&self, operation: &str, message: String) -> GitLinkError {
        match operation {
            "clone" => GitLinkError::CloneFailed {
                url: self.clone_url.clone().unwrap_or_else(|| "unknown".to_string()),
                reason: message,
            },
            "checkout" => GitLinkError::CheckoutFailed {
                reference: self.args.last().cloned().unwrap_or_default(),
                reason: message,
            },
            _ => GitLinkError::GitCommandError {
                operation: operation.to_string(),
                stderr: message,
            },
        }
    }

    /// Execute the command and return only stdout as a trimmed string
    pub async fn execute_stdout(self) -> Result<String> {
        let output = self.execute().await?;
        Ok(output.stdout.trim().to_string())
    }

    /// Execute the command and check for success, discarding output
    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}

/// Output from a Git command
pub struct GitCommandOutput {
    /// Standard output from the Git command
    pub stdout: String,
    /// Standard error output from the Git command
    pub stderr: String,
}

// Convenience builders for common Git operations

impl GitCommand {
    /// Create a clone command
    pub fn clone(url: &str, target: impl AsRef<Path>) -> Self {
        let mut cmd = Self::new().args(["clone", "--progress"]);
        cmd.args.push(url.to_string());
        cmd.args.push(target.as_ref().display().to_string());
        cmd.clone_url = Some(url.to_string());
        cmd
    }

    /// Create a checkout command
    pub fn checkout(ref_name: &str) -> Self {
        Self::new().args(["checkout", ref_name])
    }

    /// Create a checkout command that forces branch creation/update from a remote ref
    pub fn checkout_branch(branch_name: &str, remote_ref: &str) -> Self {
        Self::new().args(["checkout", "-B", branch_name, remote_ref])
    }

    /// Create a command to verify a reference exists
    pub fn verify_ref(ref_name: &str) -> Self {
        Self::new().args(["rev-parse", "--verify", "--quiet", ref_name])
    }

    /// Create a command to get the origin remote URL
    pub fn remote_url() -> Self {
        Self::new().args(["remote", "get-url", ORIGIN_REMOTE])
    }

    /// Create a command printing the branch HEAD points at; fails when detached
    pub fn symbolic_head() -> Self {
        Self::new().args(["symbolic-ref", "--short", "-q", "HEAD"])
    }

    /// Create a command printing the tag at HEAD, if HEAD is exactly tagged
    pub fn exact_tag() -> Self {
        Self::new().args(["describe", "--tags", "--exact-match", "HEAD"])
    }

    /// Create a command printing the abbreviated HEAD commit
    pub fn short_commit() -> Self {
        Self::new().args(["rev-parse", "--short", "HEAD"])
    }

    /// Create a `git --version` command
    pub fn version() -> Self {
        Self::new().arg("--version")
    }
}

use crate::models::ActivityStatus;
use async_trait::async_trait;
use regex::Regex;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;

/// Default download-client console executable
pub const DEFAULT_CONSOLE: &str = "deluge-console";

/// Default bound on a single client query
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Asks the download client whether any transfer is in progress.
///
/// Must never report [`ActivityStatus::Idle`] unless the client positively said so;
/// unreachable clients and unreadable answers are [`ActivityStatus::ProbeFailed`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityProbe {
    async fn probe(&self) -> ActivityStatus;
}

/// Probe backed by the Deluge console client.
///
/// Runs `<program> info -v -s Active` and counts the torrents it lists. Verbose
/// output has a `Name:` block per torrent on Deluge 1.3 and 2.x alike; the compact
/// 2.x form with one `[D] ...` line per torrent is understood as well.
#[derive(Debug, Clone)]
pub struct DelugeProbe {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl DelugeProbe {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: ["info", "-v", "-s", "Active"].map(String::from).to_vec(),
            timeout,
        }
    }

    /// Replace the arguments passed to the console program
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Run the console program and return its stdout, mapping every failure to a cause string.
    async fn query(&self) -> Result<String, String> {
        tracing::debug!("Querying torrent activity: {} {}", self.program, self.args.join(" "));

        let start = Instant::now();

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Failed to start {}: {}", self.program, e))?;

        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                tracing::warn!("{} timed out after {:?}", self.program, self.timeout);
                format!("{} timed out after {:?}", self.program, self.timeout)
            })?
            .map_err(|e| format!("Failed to wait for {}: {}", self.program, e))?;

        tracing::debug!(
            "{} completed in {:.2}s with exit code {:?}",
            self.program,
            start.elapsed().as_secs_f32(),
            output.status.code()
        );

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let detail = first_line(&stderr).or_else(|| first_line(&stdout));
            return Err(match detail {
                Some(line) => format!("{} exited with {}: {}", self.program, output.status, line),
                None => format!("{} exited with {}", self.program, output.status),
            });
        }

        if let Some(line) = connection_failure(&stderr).or_else(|| connection_failure(&stdout)) {
            return Err(format!("{} could not reach the daemon: {}", self.program, line));
        }

        Ok(stdout)
    }
}

impl Default for DelugeProbe {
    fn default() -> Self {
        Self::new(DEFAULT_CONSOLE, DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait]
impl ActivityProbe for DelugeProbe {
    async fn probe(&self) -> ActivityStatus {
        let stdout = match self.query().await {
            Ok(stdout) => stdout,
            Err(cause) => return ActivityStatus::ProbeFailed(cause),
        };

        match count_active_torrents(&stdout) {
            Ok(0) => ActivityStatus::Idle,
            Ok(count) => ActivityStatus::Active(count),
            Err(cause) => ActivityStatus::ProbeFailed(cause),
        }
    }
}

/// Count torrent entries in `deluge-console info` output.
///
/// An entry starts either with a `Name:` line (verbose, and 1.3 compact) or with a
/// state tag such as `[D]` (2.x compact). Empty output means no torrent matched.
/// Output with text but no recognizable entries is treated as malformed rather
/// than idle.
pub fn count_active_torrents(output: &str) -> Result<usize, String> {
    let entry = Regex::new(r"^\s*(?:Name:\s*\S|\[[A-Z]\]\s+\S)").expect("Invalid torrent entry regex");

    let mut meaningful = 0;
    let mut count = 0;
    for line in output.lines().filter(|l| !l.trim().is_empty()) {
        meaningful += 1;
        if entry.is_match(line) {
            count += 1;
        }
    }

    if meaningful > 0 && count == 0 {
        let sample = first_line(output).unwrap_or_default();
        return Err(format!("Unrecognized client output: {}", sample));
    }
    Ok(count)
}

fn connection_failure(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| {
        let lower = line.to_ascii_lowercase();
        lower.contains("failed to connect")
            || lower.contains("could not connect")
            || lower.contains("connection refused")
            || lower.contains("not connected")
    })
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}

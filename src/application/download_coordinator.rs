use std::path::{Path, PathBuf};
use std::process::Stdio;

use futures::{stream::BoxStream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Split};
use tokio::process::{Child, ChildStdout, Command};
use tokio::sync::mpsc;

use crate::domain::{CommandBuilder, DownloadOptions, LineColor, StreamEvent, ToolCommand};

pub const NO_INPUT_MESSAGE: &str =
    "No input provided. Enter a search query, a playlist URL, or upload a file.";

/// Output containing any of these is highlighted as a failure.
const FAILURE_KEYWORDS: &[&str] = &["no results", "not found", "failed", "no suitable file"];

/// Reported when sldl could not be started or was killed by a signal.
pub const ABNORMAL_EXIT: i32 = -1;

pub fn classify_line(line: &str) -> LineColor {
    let lower = line.to_lowercase();
    if FAILURE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        LineColor::Red
    } else {
        LineColor::Default
    }
}

/// Exit codes 0 and 1 both count as success; sldl uses 1 when only some items were found.
pub fn exit_event(code: Option<i32>) -> StreamEvent {
    match code {
        Some(0) | Some(1) => StreamEvent::Done,
        Some(code) => StreamEvent::Crash { code },
        None => StreamEvent::Crash {
            code: ABNORMAL_EXIT,
        },
    }
}

#[derive(Clone)]
pub struct DownloadCoordinator {
    builder: CommandBuilder,
    app_root: PathBuf,
}

impl DownloadCoordinator {
    pub fn new(builder: CommandBuilder, app_root: PathBuf) -> Self {
        Self { builder, app_root }
    }

    /// Runs sldl for the submitted options and streams its output.
    ///
    /// Without any input nothing is spawned; the stream reports the problem and finishes.
    pub fn run(&self, options: &DownloadOptions) -> BoxStream<'static, StreamEvent> {
        if !options.has_input() {
            tracing::warn!("Download requested without any input");
            return futures::stream::iter([
                StreamEvent::line(NO_INPUT_MESSAGE, LineColor::Red),
                StreamEvent::Done,
            ])
            .boxed();
        }

        relay(self.builder.build(options), self.app_root.clone())
    }
}

/// Spawns `command` in `cwd` and yields every stdout line, then every stderr line,
/// then exactly one terminal event.
pub fn relay(command: ToolCommand, cwd: PathBuf) -> BoxStream<'static, StreamEvent> {
    futures::stream::unfold(RelayState::Start { command, cwd }, |mut state| async move {
        loop {
            state = match state {
                RelayState::Start { command, cwd } => match spawn(&command, &cwd) {
                    Ok(next) => next,
                    Err(e) => {
                        tracing::error!("Failed to start {}: {}", command.program(), e);
                        return Some((
                            StreamEvent::line(
                                format!("Failed to start {}: {}", command.program(), e),
                                LineColor::Red,
                            ),
                            RelayState::Crashed {
                                code: ABNORMAL_EXIT,
                            },
                        ));
                    }
                },
                RelayState::Stdout {
                    child,
                    mut stdout,
                    stderr,
                } => match next_line(&mut stdout).await {
                    Some(text) => {
                        let color = classify_line(&text);
                        return Some((
                            StreamEvent::Line { text, color },
                            RelayState::Stdout {
                                child,
                                stdout,
                                stderr,
                            },
                        ));
                    }
                    None => RelayState::Stderr { child, stderr },
                },
                RelayState::Stderr { child, mut stderr } => match stderr.recv().await {
                    Some(text) => {
                        return Some((
                            StreamEvent::line(text, LineColor::Red),
                            RelayState::Stderr { child, stderr },
                        ));
                    }
                    None => RelayState::Exiting { child },
                },
                RelayState::Exiting { mut child } => {
                    let event = match child.wait().await {
                        Ok(status) => {
                            tracing::info!("sldl exited with {}", status);
                            exit_event(status.code())
                        }
                        Err(e) => {
                            tracing::warn!("Failed to wait for sldl: {}", e);
                            exit_event(None)
                        }
                    };
                    return Some((event, RelayState::Finished));
                }
                RelayState::Crashed { code } => {
                    return Some((StreamEvent::Crash { code }, RelayState::Finished));
                }
                RelayState::Finished => return None,
            };
        }
    })
    .boxed()
}

fn spawn(command: &ToolCommand, cwd: &Path) -> std::io::Result<RelayState> {
    tracing::info!("Launching: {}", command.redacted());

    let mut child = Command::new(command.program())
        .args(command.args())
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = child.stdout.take().map(|out| BufReader::new(out).split(b'\n'));

    // stderr is collected in the background so a chatty child cannot fill the pipe
    // and stall while stdout is still being read. Lines are released only after stdout closes.
    let (tx, rx) = mpsc::unbounded_channel();
    if let Some(err) = child.stderr.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(err).split(b'\n');
            while let Some(line) = read_segment(&mut lines).await {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
    }

    Ok(RelayState::Stdout {
        child,
        stdout,
        stderr: rx,
    })
}

async fn next_line(stdout: &mut Option<Split<BufReader<ChildStdout>>>) -> Option<String> {
    match stdout {
        Some(lines) => read_segment(lines).await,
        None => None,
    }
}

/// Next line with its terminator removed. Invalid UTF-8 is replaced, read errors end the stream.
async fn read_segment<R: AsyncBufRead + Unpin>(lines: &mut Split<R>) -> Option<String> {
    match lines.next_segment().await {
        Ok(Some(bytes)) => {
            let mut text = String::from_utf8_lossy(&bytes).into_owned();
            if text.ends_with('\r') {
                text.pop();
            }
            Some(text)
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("Error reading sldl output: {}", e);
            None
        }
    }
}

enum RelayState {
    Start {
        command: ToolCommand,
        cwd: PathBuf,
    },
    Stdout {
        child: Child,
        stdout: Option<Split<BufReader<ChildStdout>>>,
        stderr: mpsc::UnboundedReceiver<String>,
    },
    Stderr {
        child: Child,
        stderr: mpsc::UnboundedReceiver<String>,
    },
    Exiting {
        child: Child,
    },
    Crashed {
        code: i32,
    },
    Finished,
}

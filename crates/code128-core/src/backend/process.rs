//! Process-based backends.
//!
//! The image is written to a temp file, the tool runs with fixed arguments
//! followed by the file path, and stdout is parsed. The tool runs under a
//! timeout; stdout and stderr are drained on helper threads so a tool that
//! writes a lot cannot block on a full pipe.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use image::GrayImage;
use tracing::debug;

use super::{non_empty, BackendDecoder, ZBAR, ZXING};
use crate::config::ToolConfig;
use crate::encode::{write_temp_image, TempFormat};
use crate::error::BackendError;

/// How often a running tool is polled for exit.
///
/// On timeout only the direct child is killed. A wrapper script that runs the
/// real decoder without `exec` leaves that grandchild running, holding the
/// output pipes open until it exits; the drain threads are detached rather
/// than joined in that case, so `decode` still returns at the deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How a tool's stdout is turned into a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputParser {
    /// Whole stdout, trimmed.
    Raw,
    /// Remainder of the first line starting with `prefix`, trimmed.
    Labeled { prefix: String },
}

impl OutputParser {
    /// Parse tool stdout into a payload.
    pub fn parse(&self, tool: &str, stdout: &str) -> Result<String, BackendError> {
        match self {
            OutputParser::Raw => non_empty(tool, stdout),
            OutputParser::Labeled { prefix } => stdout
                .lines()
                .find_map(|line| line.strip_prefix(prefix.as_str()))
                .ok_or_else(|| BackendError::NoResult {
                    tool: tool.to_string(),
                })
                .and_then(|rest| non_empty(tool, rest)),
        }
    }
}

/// Backend that shells out to a command-line decoder.
#[derive(Debug, Clone)]
pub struct ProcessDecoder {
    name: String,
    program: String,
    args: Vec<String>,
    parser: OutputParser,
    format: TempFormat,
    temp_dir: PathBuf,
    timeout: Duration,
}

impl ProcessDecoder {
    /// Create a decoder running `program args... <tempfile>`.
    pub fn new(
        name: impl Into<String>,
        program: impl Into<String>,
        args: Vec<String>,
        parser: OutputParser,
        format: TempFormat,
        temp_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
            parser,
            format,
            temp_dir: temp_dir.into(),
            timeout: Duration::from_millis(crate::config::DEFAULT_TIMEOUT_MS),
        }
    }

    /// Set the per-invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `zbarimg --raw <file>` reading a JPEG; stdout is the payload.
    pub fn zbar(tools: &ToolConfig, temp_dir: impl Into<PathBuf>) -> Self {
        Self::new(
            ZBAR,
            tools.zbar_program.clone(),
            vec!["--raw".to_string()],
            OutputParser::Raw,
            TempFormat::Jpeg {
                quality: tools.jpeg_quality,
            },
            temp_dir,
        )
        .with_timeout(tools.timeout())
    }

    /// `ZXingReader -format CODE_128 <file>` reading a PNG; payload follows `Text:`.
    pub fn zxing(tools: &ToolConfig, temp_dir: impl Into<PathBuf>) -> Self {
        Self::new(
            ZXING,
            tools.zxing_program.clone(),
            vec!["-format".to_string(), "CODE_128".to_string()],
            OutputParser::Labeled {
                prefix: "Text:".to_string(),
            },
            TempFormat::Png,
            temp_dir,
        )
        .with_timeout(tools.timeout())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn format(&self) -> TempFormat {
        self.format
    }

    /// Run the tool on `path`, returning its exit status, stdout and stderr.
    fn run(&self, path: &Path) -> Result<(ExitStatus, String, String), BackendError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| BackendError::Spawn {
                tool: self.program.clone(),
                source,
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self.wait_with_timeout(&mut child)?;

        let stdout = join_output(stdout);
        let stderr = join_output(stderr);
        Ok((status, stdout, stderr))
    }

    /// Poll the child until it exits or the timeout elapses, killing it on timeout.
    fn wait_with_timeout(&self, child: &mut Child) -> Result<ExitStatus, BackendError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if Instant::now() >= deadline => {
                    // Reap so the child does not linger as a zombie
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(BackendError::Timeout {
                        tool: self.program.clone(),
                        timeout: self.timeout,
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(source) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(BackendError::Process {
                        tool: self.program.clone(),
                        source,
                    });
                }
            }
        }
    }
}

impl BackendDecoder for ProcessDecoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn decode(&self, image: &GrayImage) -> Result<String, BackendError> {
        // Held until the end of this call; dropping it deletes the file
        let temp = write_temp_image(image, self.format, &self.temp_dir)?;
        debug!(tool = %self.program, file = %temp.path().display(), "running external decoder");

        let (status, stdout, stderr) = self.run(temp.path())?;
        if !status.success() {
            return Err(BackendError::ExitStatus {
                tool: self.program.clone(),
                status,
                stderr: stderr.trim().to_string(),
            });
        }

        self.parser.parse(&self.program, &stdout)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn join_output(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

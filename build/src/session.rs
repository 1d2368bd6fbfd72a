//! One build's output, from first byte to extracted diagnostics.
//!
//! A session is created per build and consumed by [`BuildSession::finish`],
//! so the extractor runs at most once per build and no output can leak from
//! one build into the next.

use anyhow::{Context, Result};
use buildlens_extract::{Extraction, extract_report};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};

use crate::buffer::RawOutputBuffer;

/// Read size for draining compiler stdout.
const READ_CHUNK_BYTES: usize = 8 * 1024;

/// Log target for mirrored compiler stderr.
const COMPILER_LOG_TARGET: &str = "buildlens::compiler";

/// Output of one compiler run, accumulated until the run ends.
#[derive(Debug, Default)]
pub struct BuildSession {
    stdout: RawOutputBuffer,
    stderr_lines: usize,
}

impl BuildSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain a compiler's stdout and stderr until both reach EOF.
    ///
    /// Both streams are read concurrently so neither pipe can fill up and
    /// stall the child. Stdout is captured; stderr is only mirrored to the
    /// log.
    pub async fn drain<O, E>(stdout: O, stderr: E) -> Result<Self>
    where
        O: AsyncRead + Unpin,
        E: AsyncRead + Unpin,
    {
        let (stdout, stderr_lines) =
            tokio::try_join!(capture_stdout(stdout), mirror_stderr(stderr))?;
        Ok(Self {
            stdout,
            stderr_lines,
        })
    }

    /// Append a chunk of compiler stdout.
    pub fn push_stdout(&mut self, chunk: &[u8]) {
        self.stdout.push(chunk);
    }

    /// Mirror one line of compiler stderr to the log.
    pub fn push_stderr_line(&mut self, line: &str) {
        log_stderr_line(line);
        self.stderr_lines += 1;
    }

    /// Stdout bytes captured so far.
    #[must_use]
    pub fn stdout_len(&self) -> usize {
        self.stdout.len()
    }

    /// End the build and extract diagnostics from everything captured.
    #[must_use]
    pub fn finish(self) -> BuildReport {
        let stdout_bytes = self.stdout.len();
        let text = self.stdout.into_text();
        let extraction = extract_report(&text);

        tracing::info!(
            stdout_bytes,
            stderr_lines = self.stderr_lines,
            diagnostics = extraction.diagnostics().total_count(),
            skipped = extraction.skipped().len(),
            "Build output processed"
        );

        BuildReport {
            extraction,
            stdout_bytes,
            stderr_lines: self.stderr_lines,
        }
    }
}

/// Result of a finished [`BuildSession`].
#[derive(Debug)]
pub struct BuildReport {
    extraction: Extraction,
    stdout_bytes: usize,
    stderr_lines: usize,
}

impl BuildReport {
    #[must_use]
    pub fn extraction(&self) -> &Extraction {
        &self.extraction
    }

    #[must_use]
    pub fn into_extraction(self) -> Extraction {
        self.extraction
    }

    #[must_use]
    pub fn stdout_bytes(&self) -> usize {
        self.stdout_bytes
    }

    #[must_use]
    pub fn stderr_lines(&self) -> usize {
        self.stderr_lines
    }
}

async fn capture_stdout<R: AsyncRead + Unpin>(mut reader: R) -> Result<RawOutputBuffer> {
    let mut buffer = RawOutputBuffer::new();
    let mut chunk = vec![0u8; READ_CHUNK_BYTES];
    loop {
        let read = reader
            .read(&mut chunk)
            .await
            .context("reading compiler stdout")?;
        if read == 0 {
            return Ok(buffer);
        }
        buffer.push(&chunk[..read]);
    }
}

async fn mirror_stderr<R: AsyncRead + Unpin>(reader: R) -> Result<usize> {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    let mut count = 0;
    loop {
        line.clear();
        let read = reader
            .read_until(b'\n', &mut line)
            .await
            .context("reading compiler stderr")?;
        if read == 0 {
            return Ok(count);
        }
        log_stderr_line(&String::from_utf8_lossy(&line));
        count += 1;
    }
}

fn log_stderr_line(line: &str) {
    let line = line.trim_end_matches(['\r', '\n']);
    tracing::info!(target: COMPILER_LOG_TARGET, "{line}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildlens_types::Severity;

    const OUTPUT: &str = "Compiling...\n/a/b.swift:10:5: error: missing return\n    return\n    ^\n";

    #[test]
    fn test_empty_session_has_no_diagnostics() {
        let report = BuildSession::new().finish();
        assert!(report.extraction().diagnostics().is_empty());
        assert_eq!(report.stdout_bytes(), 0);
        assert_eq!(report.stderr_lines(), 0);
    }

    #[test]
    fn test_chunked_stdout_is_extracted_whole() {
        let mut session = BuildSession::new();
        // Split in the middle of the header.
        let (head, tail) = OUTPUT.split_at(30);
        session.push_stdout(head.as_bytes());
        session.push_stdout(tail.as_bytes());
        assert_eq!(session.stdout_len(), OUTPUT.len());

        let report = session.finish();
        let items = report.extraction().diagnostics().get("/a/b.swift").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].end_col(), 5);
    }

    #[test]
    fn test_stderr_is_not_parsed() {
        let mut session = BuildSession::new();
        session.push_stderr_line("/a/b.swift:1:1: error: from stderr");
        let report = session.finish();
        assert!(report.extraction().diagnostics().is_empty());
        assert_eq!(report.stderr_lines(), 1);
    }

    #[tokio::test]
    async fn test_drain_reads_both_streams() {
        let stderr = b"warning: unrelated\nsecond line".as_slice();
        let session = BuildSession::drain(OUTPUT.as_bytes(), stderr)
            .await
            .unwrap();
        let report = session.finish();

        assert_eq!(report.stdout_bytes(), OUTPUT.len());
        assert_eq!(report.stderr_lines(), 2);
        let diagnostics = report.into_extraction().into_diagnostics();
        let items = diagnostics.get("/a/b.swift").unwrap();
        assert_eq!(items[0].severity(), Severity::Error);
        assert_eq!(items[0].line(), 9);
    }

    #[tokio::test]
    async fn test_drain_empty_streams() {
        let session = BuildSession::drain(tokio::io::empty(), tokio::io::empty())
            .await
            .unwrap();
        assert_eq!(session.stdout_len(), 0);
        assert!(session.finish().extraction().diagnostics().is_empty());
    }
}

//! Line-delimited JSON tool interface.
//!
//! Each input line is a request object; each output line is the
//! [`CommitResult`] for it. This lets an editor or agent host call the
//! generator as a tool over stdio.

use std::io;
use std::path::Path;

use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::commit::{CommitResult, generate_with};
use crate::git::ChangeSetProvider;
use crate::logging::PipelineLogger;

/// One tool call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ToolRequest {
    /// Repository path; the server's current directory when absent.
    #[serde(default)]
    pub working_directory: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

/// Answer a single request line.
///
/// A line that is not a valid request gets the command-error fallback.
pub async fn handle_request<P, L>(line: &str, provider: &P, logger: &L) -> CommitResult
where
    P: ChangeSetProvider + ?Sized,
    L: PipelineLogger + ?Sized,
{
    let request: ToolRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            logger.error(&format!("Invalid tool request: {e}"));
            return CommitResult::command_fallback();
        }
    };

    let result = generate_with(
        provider,
        logger,
        request.working_directory.as_deref().map(Path::new),
        request.style.as_deref().unwrap_or("conventional"),
    )
    .await;

    logger.info(&format!("Files analyzed: {}", result.files_analyzed));
    if !result.has_changes {
        logger.warning("No changes to commit");
    }
    result
}

/// Serve requests from `reader` until EOF, writing one JSON line per request.
///
/// Returns the number of requests answered.
pub async fn serve<R, W, P, L>(
    reader: R,
    mut writer: W,
    provider: &P,
    logger: &L,
) -> io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    P: ChangeSetProvider + ?Sized,
    L: PipelineLogger + ?Sized,
{
    let mut lines = reader.lines();
    let mut answered = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let result = handle_request(line, provider, logger).await;
        let mut payload = serde_json::to_string(&result).map_err(io::Error::other)?;
        payload.push('\n');
        writer.write_all(payload.as_bytes()).await?;
        writer.flush().await?;
        answered += 1;
    }

    debug!("Tool input closed after {} requests", answered);
    Ok(answered)
}

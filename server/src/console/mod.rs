pub mod commands;
pub mod registry;

use crate::auth::session_service::SessionService;
use crate::console::commands::CommandOutcome;
use crate::console::registry::CommandRegistry;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{info, warn};

const PROMPT: &[u8] = b">> ";

/// Reads commands from stdin until `stop` is entered. When stdin is closed the
/// console goes quiet but never completes, the server keeps running.
pub async fn start(registry: &CommandRegistry, session_service: &SessionService) {
    info!("Starting console...");
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    match run(registry, session_service, stdin, &mut stdout).await {
        Ok(CommandOutcome::Stop) => return,
        Ok(CommandOutcome::Continue) => info!("Console input has been closed."),
        Err(err) => warn!("Console has failed. Error: {err}"),
    }

    std::future::pending::<()>().await;
}

/// Returns `Stop` once a command requests it, `Continue` when the input ends.
pub async fn run<R, W>(
    registry: &CommandRegistry,
    session_service: &SessionService,
    reader: R,
    writer: &mut W,
) -> std::io::Result<CommandOutcome>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    loop {
        writer.write_all(PROMPT).await?;
        writer.flush().await?;
        let Some(line) = lines.next_line().await? else {
            return Ok(CommandOutcome::Continue);
        };

        let output = registry.dispatch(session_service, &line).await;
        for line in &output.lines {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }

        if output.outcome == CommandOutcome::Stop {
            writer.flush().await?;
            return Ok(CommandOutcome::Stop);
        }
    }
}

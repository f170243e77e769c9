//! `run` command: execute the task locally and print its event stream.
//!
//! Frames are written to stdout exactly as they would go over the wire.
//! Ctrl-C plays the part of a client disconnect; a closed stdout does too.

use std::io::Write;
use std::sync::Arc;

use anyhow::bail;
use stepcast_core::{RunState, TaskConfig, TaskRun, TokenMonitor, arithmetic_task, wire};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub async fn execute(config: TaskConfig) -> anyhow::Result<()> {
    let token = CancellationToken::new();
    let interrupt = tokio::spawn({
        let token = token.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        }
    });

    let mut stdout = std::io::stdout();
    let state = run_local(&config, &mut stdout, token).await;
    interrupt.abort();

    match state? {
        RunState::AbortedFailed => bail!("task failed"),
        state => {
            info!(?state, "Local run finished");
            Ok(())
        }
    }
}

/// Drive one run to completion, writing each frame to `out` as it is produced.
pub async fn run_local<W: Write>(
    config: &TaskConfig,
    out: &mut W,
    token: CancellationToken,
) -> anyhow::Result<RunState> {
    let task = arithmetic_task(config)?;
    let monitor = TokenMonitor::new(token.clone());
    let mut run = TaskRun::new(task, Arc::new(config.executor()), Arc::new(monitor));

    loop {
        let next = tokio::select! {
            event = run.next_event() => Some(event),
            () = token.cancelled() => None,
        };

        let Some(next) = next else {
            run.abort_disconnected();
            break;
        };
        let Some(event) = next else {
            break;
        };

        let frame = wire::encode_frame(&event)?;
        if let Err(err) = out.write_all(frame.as_bytes()).and_then(|()| out.flush()) {
            debug!(%err, "Output closed, stopping run");
            run.abort_disconnected();
            break;
        }
    }

    Ok(run.state())
}

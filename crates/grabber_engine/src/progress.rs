use engine_logging::{engine_debug, engine_info, engine_trace};

use crate::EngineEvent;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Sink that reports pipeline events through the logging facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: EngineEvent) {
        match event {
            EngineEvent::StageStarted { stage, input } => {
                engine_info!("{} started for {}", stage, input);
            }
            EngineEvent::Transfer(progress) => {
                engine_trace!(
                    "{} [{}/{}]",
                    progress.url,
                    progress.bytes_downloaded,
                    progress.bytes_total
                );
            }
            EngineEvent::TransferCompleted(progress) => {
                engine_debug!(
                    "transfer complete: {} bytes -> {:?}",
                    progress.bytes_downloaded,
                    progress.destination
                );
            }
        }
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: EngineEvent) {}
}

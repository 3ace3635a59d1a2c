use std::path::{Path, PathBuf};
use std::sync::Arc;

use grabber_core::AppTarget;

use crate::download::Downloader;
use crate::extract::extract;
use crate::locate::locate;
use crate::progress::ProgressSink;
use crate::resolve::resolve_latest;
use crate::transport::Transport;
use crate::{
    CandidatePage, DownloadTarget, EngineEvent, FetchSettings, PipelineError, SiteEndpoints, Stage,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub version: String,
    pub candidate: CandidatePage,
    pub download: DownloadTarget,
    pub path: PathBuf,
}

/// Resolver -> locator -> extractor -> downloader, strictly in sequence.
///
/// Any stage failure aborts the run; nothing is retried.
pub struct Pipeline {
    transport: Arc<dyn Transport>,
    sites: SiteEndpoints,
    settings: FetchSettings,
}

impl Pipeline {
    pub fn new(transport: Arc<dyn Transport>, sites: SiteEndpoints, settings: FetchSettings) -> Self {
        Self {
            transport,
            sites,
            settings,
        }
    }

    pub async fn run(
        &self,
        target: &AppTarget,
        requested_version: Option<&str>,
        dest_dir: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<PipelineOutput, PipelineError> {
        let transport = self.transport.as_ref();
        let requested = requested_version
            .map(str::trim)
            .filter(|version| !version.is_empty());

        let version = match requested {
            Some(version) => version.to_string(),
            None => {
                let input = target.to_string();
                sink.emit(started(Stage::Resolving, &input));
                resolve_latest(transport, &self.sites, target)
                    .await
                    .map_err(|f| f.at(Stage::Resolving, input))?
            }
        };

        let input = format!("{target} {version}");
        sink.emit(started(Stage::Locating, &input));
        let candidate = locate(transport, &self.sites, &self.settings, target, &version)
            .await
            .map_err(|f| f.at(Stage::Locating, input))?;

        sink.emit(started(Stage::Extracting, &candidate.url));
        let download = extract(transport, &self.sites, target, &version, &candidate)
            .await
            .map_err(|f| f.at(Stage::Extracting, candidate.url.clone()))?;

        sink.emit(started(Stage::Downloading, &download.final_url));
        let path = Downloader::new(transport, self.settings.chunk_size)
            .download(
                &download.final_url,
                &download.suggested_filename,
                dest_dir,
                sink,
            )
            .await
            .map_err(|f| f.at(Stage::Downloading, download.final_url.clone()))?;

        Ok(PipelineOutput {
            version,
            candidate,
            download,
            path,
        })
    }
}

fn started(stage: Stage, input: &str) -> EngineEvent {
    EngineEvent::StageStarted {
        stage,
        input: input.to_string(),
    }
}

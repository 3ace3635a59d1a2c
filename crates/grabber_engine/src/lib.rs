//! Grabber engine: transport, page resolution and download pipeline.
mod decode;
mod download;
mod extract;
mod feed;
mod html;
mod locate;
mod persist;
mod pipeline;
mod progress;
mod resolve;
mod sites;
mod transport;
mod types;

pub use decode::{decode_html, DecodedHtml};
pub use download::{final_file_name, Downloader};
pub use extract::extract;
pub use locate::locate;
pub use persist::{ensure_output_dir, PersistError, StagedFile};
pub use pipeline::{Pipeline, PipelineOutput};
pub use progress::{LogProgressSink, NullProgressSink, ProgressSink};
pub use resolve::resolve_latest;
pub use sites::SiteEndpoints;
pub use transport::{BinaryResponse, FetchSettings, Page, ReqwestTransport, Transport};
pub use types::{
    CandidatePage, DownloadTarget, EngineEvent, Failure, FailureKind, PipelineError, Stage,
    TransferProgress,
};

use std::io;
use std::path::{Path, PathBuf};

use engine_logging::{engine_info, engine_warn};
use grabber_core::{extension_from_url, is_package_extension, split_extension, with_extension};
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;

use crate::persist::StagedFile;
use crate::progress::ProgressSink;
use crate::transport::Transport;
use crate::{EngineEvent, Failure, FailureKind, TransferProgress};

const FALLBACK_EXTENSION: &str = "apk";

/// Streams a binary to disk chunk by chunk.
pub struct Downloader<'a> {
    transport: &'a dyn Transport,
    chunk_size: usize,
}

impl<'a> Downloader<'a> {
    pub fn new(transport: &'a dyn Transport, chunk_size: usize) -> Self {
        Self {
            transport,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Downloads `url` into `dest_dir` and returns the written path.
    ///
    /// The extension comes from the post-redirect URL, not from
    /// `suggested_name`. Nothing is written until the response is accepted,
    /// and a failed transfer leaves no file behind.
    pub async fn download(
        &self,
        url: &str,
        suggested_name: &str,
        dest_dir: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<PathBuf, Failure> {
        let response = self.transport.open_stream(url).await?;
        let file_name = final_file_name(suggested_name, &response.final_url);
        let destination = dest_dir.join(&file_name);
        let bytes_total = response.content_length.unwrap_or(0);

        let mut staged = StagedFile::create_in(dest_dir)?;
        let mut reader = StreamReader::new(response.body);
        let mut buf = vec![0u8; self.chunk_size];
        let mut progress = TransferProgress {
            url: response.final_url.clone(),
            bytes_downloaded: 0,
            bytes_total,
            destination: destination.clone(),
        };

        loop {
            let read = reader.read(&mut buf).await.map_err(map_read_error)?;
            if read == 0 {
                break;
            }
            staged.write_chunk(&buf[..read])?;
            progress.bytes_downloaded = staged.written();
            sink.emit(EngineEvent::Transfer(progress.clone()));
        }

        if length_mismatch(bytes_total, progress.bytes_downloaded) {
            engine_warn!(
                "{} declared {} bytes but sent {}",
                progress.url,
                bytes_total,
                progress.bytes_downloaded
            );
        }

        let path = staged.commit(&destination)?;
        engine_info!(
            "URL:{} [{}/{}] -> \"{}\" [1]",
            progress.url,
            progress.bytes_downloaded,
            progress.bytes_total,
            file_name
        );
        sink.emit(EngineEvent::TransferCompleted(progress));
        Ok(path)
    }
}

/// `suggested_name` with its extension replaced by the one in `final_url`.
///
/// Falls back to the suggested extension, then to `apk`, when the URL path has none.
pub fn final_file_name(suggested_name: &str, final_url: &str) -> String {
    let extension = extension_from_url(final_url)
        .or_else(|| split_extension(suggested_name).1.map(str::to_ascii_lowercase))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());
    if !is_package_extension(&extension) {
        engine_warn!("{final_url} yields unexpected extension .{extension}");
    }
    with_extension(suggested_name, &extension)
}

/// A zero total means the size was never declared, so nothing can mismatch.
fn length_mismatch(bytes_total: u64, bytes_downloaded: u64) -> bool {
    bytes_total > 0 && bytes_downloaded != bytes_total
}

fn map_read_error(err: io::Error) -> Failure {
    let kind = if err.kind() == io::ErrorKind::TimedOut {
        FailureKind::Timeout
    } else {
        FailureKind::Network
    };
    Failure::new(kind, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::length_mismatch;

    #[test]
    fn undeclared_length_never_mismatches() {
        assert!(!length_mismatch(0, 16));
        assert!(!length_mismatch(16, 16));
        assert!(length_mismatch(20, 16));
    }
}

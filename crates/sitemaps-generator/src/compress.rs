//! Gzip payload writing for child sitemaps.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use flate2::{Compression, write::GzEncoder};
use tracing::{debug, warn};

/// Compress `data` into a gzip file at `path`, replacing any existing file.
///
/// The stream is finished and synced before returning. If anything fails
/// after the file was created, the partial file is removed.
pub fn write_gzip(path: &Path, data: &[u8]) -> io::Result<()> {
    let file = File::create(path)?;

    if let Err(err) = compress_into(file, data) {
        discard_partial(path);
        return Err(err);
    }

    debug!(path = %path.display(), bytes = data.len(), "wrote gzip payload");
    Ok(())
}

fn compress_into(file: File, data: &[u8]) -> io::Result<()> {
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    encoder.write_all(data)?;

    let file = encoder.finish()?.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

fn discard_partial(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        warn!(path = %path.display(), error = %err, "failed to remove partial gzip file");
    }
}

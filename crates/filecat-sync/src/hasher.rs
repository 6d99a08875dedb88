//! Content hashing
//!
//! SHA-256 over the whole byte stream, read in 64 KiB blocks, formatted
//! as lowercase hex. Each call uses a fresh digest context.

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

const BLOCK_SIZE: usize = 64 * 1024;

/// Digest everything `reader` yields
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BLOCK_SIZE];

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Digest the current content of the file at `path`
///
/// Runs on the blocking pool. Open and read failures are returned, not
/// raised, so the caller can skip the file.
pub async fn hash_file(path: &Path) -> io::Result<String> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || hash_reader(File::open(&path)?))
        .await
        .map_err(io::Error::other)?
}

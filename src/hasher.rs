use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::DedupError;

/// Read buffer size for hashing (64KB)
const CHUNK_SIZE: usize = 64 * 1024;

/// Content fingerprint of a file
pub type Digest = blake3::Hash;

/// Compute the Blake3 hash of the entire file contents.
///
/// The file is streamed in fixed-size chunks, so memory use does not grow
/// with file size. The result depends on the bytes only, never on the name.
pub fn fingerprint(path: &Path) -> Result<Digest, DedupError> {
    let unreadable = |source: io::Error| DedupError::UnreadableFile {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(unreadable)?;
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut hasher = blake3::Hasher::new();

    loop {
        let bytes_read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(unreadable(e)),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize())
}

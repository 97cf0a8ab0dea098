// src/hash.rs

//! SHA-256 helpers
//!
//! Used for two things:
//! - **Fingerprints**: the directory name for each metadata source under
//!   `<base>/metadata/`, derived from the metadata URL string
//! - **Cache checks**: comparing an artifact already on disk against the
//!   digest recorded in trusted targets metadata

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Length of a hex-encoded SHA-256 digest
pub const SHA256_HEX_LEN: usize = 64;

/// Buffer size for streaming file hashes (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// Compute the fingerprint of a metadata URL
///
/// Lowercase hex SHA-256 of the URL's UTF-8 bytes. The same URL always maps
/// to the same fingerprint; no normalisation is applied, so
/// `https://example.com` and `https://example.com/` are distinct sources.
pub fn fingerprint(metadata_url: &str) -> String {
    sha256_hex(metadata_url.as_bytes())
}

/// Hex-encoded SHA-256 of a byte slice
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// SHA-256 digest and byte length of a file, streamed
pub fn sha256_file(path: &Path) -> io::Result<([u8; 32], u64)> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];
    let mut length: u64 = 0;

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
        length += bytes_read as u64;
    }

    Ok((hasher.finalize().into(), length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fingerprint_known_value() {
        assert_eq!(
            fingerprint("test string"),
            "d5579c46dfcc7f18207013e65b44e4cb4e2c2298f4ac457ba8f82743f31e930b"
        );
    }

    #[test]
    fn test_fingerprint_shape() {
        for url in ["", "https://metadata.rstuf.org", "http://localhost:8080/ünïcode"] {
            let fp = fingerprint(url);
            assert_eq!(fp.len(), SHA256_HEX_LEN);
            assert!(fp.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
            assert_eq!(fp, fingerprint(url));
        }
    }

    #[test]
    fn test_fingerprint_distinguishes_trailing_slash() {
        assert_ne!(
            fingerprint("https://metadata.rstuf.org"),
            fingerprint("https://metadata.rstuf.org/")
        );
    }

    #[test]
    fn test_sha256_file_matches_in_memory() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello tuf").unwrap();
        file.flush().unwrap();

        let (digest, len) = sha256_file(file.path()).unwrap();
        assert_eq!(len, 9);
        assert_eq!(hex::encode(digest), sha256_hex(b"hello tuf"));
    }
}

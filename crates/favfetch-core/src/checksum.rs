//! SHA-256 of saved icons, used to tell a re-download apart from a change.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub fn sha256_path(path: &Path) -> io::Result<String> {
    let mut f = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// True if both files exist and have identical content.
pub fn same_content(a: &Path, b: &Path) -> io::Result<bool> {
    if !a.is_file() || !b.is_file() {
        return Ok(false);
    }
    if a.metadata()?.len() != b.metadata()?.len() {
        return Ok(false);
    }
    Ok(sha256_path(a)? == sha256_path(b)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sha256_path_empty_file() {
        let f = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(
            sha256_path(f.path()).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_path_known_content() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello\n").unwrap();
        f.flush().unwrap();
        assert_eq!(
            sha256_path(f.path()).unwrap(),
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
    }

    #[test]
    fn same_content_detects_equal_and_different_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.ico");
        let b = dir.path().join("b.ico");
        let c = dir.path().join("c.ico");
        std::fs::write(&a, b"icon-bytes").unwrap();
        std::fs::write(&b, b"icon-bytes").unwrap();
        std::fs::write(&c, b"other-bytes").unwrap();
        assert!(same_content(&a, &b).unwrap());
        assert!(!same_content(&a, &c).unwrap());
        assert!(!same_content(&a, &dir.path().join("missing.ico")).unwrap());
    }
}

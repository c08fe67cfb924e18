//! `keel snapshot` command family
//!
//! `snapshot` itself only groups its children; running it bare prints the
//! family's help.

pub mod inspect;
pub mod save;

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

pub const SYNOPSIS: &str = "Saves and inspects snapshots of Keel state";

pub const HELP: &str = "\
Usage: keel snapshot <subcommand> [options] [args]

  This command has subcommands for saving and inspecting the state
  of a Keel node as a point-in-time snapshot file.

  Inspect a snapshot:

      $ keel snapshot inspect backup.snap

  Save a copy of a snapshot:

      $ keel snapshot save backup.snap /mnt/backups/backup.snap

  For more examples, ask for subcommand help or view the documentation.";

/// Hex-encoded SHA-256 of a file's contents
pub(crate) fn sha256_hex(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_sha256_of_known_content() {
        let mut file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"abc").unwrap();

        assert_eq!(
            sha256_hex(file.path()).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_of_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(sha256_hex(&dir.path().join("absent")).is_err());
    }
}

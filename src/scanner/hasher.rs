//! Content digests for duplicate confirmation.
//!
//! # Overview
//!
//! The duplicate index only asks for a digest once two files share a size.
//! It talks to the [`DigestProvider`] trait so the digest source can be
//! swapped: in-process SHA-256 (default), in-process BLAKE3, or an external
//! hashing command such as `sha256sum`.
//!
//! All providers produce a [`Digest`]: a lower-case hexadecimal string.
//! Equal digests are treated as proof of identical content, so a single scan
//! must use a single provider.
//!
//! # Example
//!
//! ```no_run
//! use dupscan::scanner::{DigestProvider, Sha256Hasher};
//! use std::path::Path;
//!
//! let mut hasher = Sha256Hasher::new();
//! let digest = hasher.digest(Path::new("Cargo.toml")).unwrap();
//! println!("{}", digest);
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::process::Command;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use super::HashError;

/// Read buffer for streaming hashers (64KB).
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// A printable content fingerprint.
///
/// The length depends on the provider that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(String);

impl Digest {
    /// Encode raw digest bytes as lower-case hex.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Accept a hex string produced by an external tool.
    ///
    /// Returns `None` for empty input or anything `hex` cannot decode
    /// (odd length, non-hex characters). Upper-case digits are folded to
    /// lower case.
    #[must_use]
    pub fn from_hex(text: &str) -> Option<Self> {
        match hex::decode(text) {
            Ok(bytes) if !bytes.is_empty() => Some(Self::from_bytes(&bytes)),
            _ => None,
        }
    }

    /// The hex representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of content digests consumed by the duplicate index.
///
/// Implementations must be deterministic for identical content and must
/// tolerate being called repeatedly for different paths.
pub trait DigestProvider {
    /// Compute the digest of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`HashError`] if the file cannot be read or the external
    /// facility fails. Callers treat this as fatal.
    fn digest(&mut self, path: &Path) -> Result<Digest, HashError>;
}

impl<P: DigestProvider + ?Sized> DigestProvider for &mut P {
    fn digest(&mut self, path: &Path) -> Result<Digest, HashError> {
        (**self).digest(path)
    }
}

impl<P: DigestProvider + ?Sized> DigestProvider for Box<P> {
    fn digest(&mut self, path: &Path) -> Result<Digest, HashError> {
        (**self).digest(path)
    }
}

fn open_buffered(path: &Path) -> Result<BufReader<File>, HashError> {
    let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
    Ok(BufReader::with_capacity(READ_BUFFER_SIZE, file))
}

/// In-process streaming SHA-256.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    /// Create a new SHA-256 hasher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DigestProvider for Sha256Hasher {
    fn digest(&mut self, path: &Path) -> Result<Digest, HashError> {
        let mut reader = open_buffered(path)?;
        let mut hasher = Sha256::new();
        io::copy(&mut reader, &mut hasher).map_err(|e| HashError::from_io(path, e))?;
        Ok(Digest::from_bytes(&hasher.finalize()))
    }
}

/// In-process streaming BLAKE3.
#[derive(Debug, Default, Clone, Copy)]
pub struct Blake3Hasher;

impl Blake3Hasher {
    /// Create a new BLAKE3 hasher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DigestProvider for Blake3Hasher {
    fn digest(&mut self, path: &Path) -> Result<Digest, HashError> {
        let mut reader = open_buffered(path)?;
        let mut hasher = blake3::Hasher::new();
        io::copy(&mut reader, &mut hasher).map_err(|e| HashError::from_io(path, e))?;
        Ok(Digest::from_bytes(hasher.finalize().as_bytes()))
    }
}

/// Digest computed by an external command.
///
/// The command is run as `<program> [args...] <path>` and the first
/// whitespace-delimited token of its standard output is the digest, which
/// matches the output of `sha256sum`, `b3sum` and `sha256 -q`. GNU tools
/// prefix that token with a backslash when the file name needs escaping; the marker
/// is dropped.
#[derive(Debug, Clone)]
pub struct CommandHasher {
    program: String,
    args: Vec<String>,
}

impl CommandHasher {
    /// Build a hasher from a command line such as `"sha256sum"` or `"sha256 -q"`.
    ///
    /// Returns `None` for a blank command line.
    #[must_use]
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut words = command_line.split_whitespace().map(str::to_owned);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }

    /// The platform's stock SHA-256 utility.
    #[must_use]
    pub fn system_default() -> Self {
        if cfg!(target_os = "freebsd") {
            // BSD `sha256` prints "SHA256 (path) = digest" unless quiet.
            Self {
                program: "sha256".to_string(),
                args: vec!["-q".to_string()],
            }
        } else {
            Self {
                program: "sha256sum".to_string(),
                args: Vec::new(),
            }
        }
    }

    /// Program name used for diagnostics.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl DigestProvider for CommandHasher {
    fn digest(&mut self, path: &Path) -> Result<Digest, HashError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|e| HashError::Command {
                command: self.program.clone(),
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HashError::Command {
                command: self.program.clone(),
                path: path.to_path_buf(),
                detail: format!("{} ({})", output.status, stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let token = stdout.split_whitespace().next().unwrap_or_default();
        let token = token.strip_prefix('\\').unwrap_or(token);
        Digest::from_hex(token).ok_or_else(|| HashError::MalformedOutput {
            path: path.to_path_buf(),
            output: stdout.lines().next().unwrap_or_default().to_string(),
        })
    }
}

/// Selectable digest algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// In-process SHA-256
    #[default]
    Sha256,
    /// In-process BLAKE3
    Blake3,
    /// External hashing command (see `--hash-command`)
    Command,
}

impl DigestAlgorithm {
    /// Build the provider for this algorithm.
    ///
    /// `command` overrides the external command line for [`DigestAlgorithm::Command`];
    /// it is ignored by the in-process algorithms.
    #[must_use]
    pub fn provider(self, command: Option<&str>) -> Box<dyn DigestProvider> {
        match self {
            Self::Sha256 => Box::new(Sha256Hasher::new()),
            Self::Blake3 => Box::new(Blake3Hasher::new()),
            Self::Command => Box::new(
                command
                    .and_then(CommandHasher::parse)
                    .unwrap_or_else(CommandHasher::system_default),
            ),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha256"),
            Self::Blake3 => write!(f, "blake3"),
            Self::Command => write!(f, "command"),
        }
    }
}

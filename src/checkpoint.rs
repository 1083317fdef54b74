//! Epoch checkpoints for the training loop that consumes degraded pairs.
//!
//! Each epoch is one file named `model_epoch{N}.pth` inside a checkpoint
//! directory. Model and optimizer state are opaque byte blobs; the file holds
//! the model blob length as a little-endian `u64`, then both blobs back to back.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

const PREFIX: &str = "model_epoch";
const EXTENSION: &str = "pth";

/// Serialized model and optimizer state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkpoint {
    pub net: Vec<u8>,
    pub optim: Vec<u8>,
}

impl Checkpoint {
    fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.net.len() + self.optim.len());
        bytes.extend_from_slice(&(self.net.len() as u64).to_le_bytes());
        bytes.extend_from_slice(&self.net);
        bytes.extend_from_slice(&self.optim);
        bytes
    }

    fn decode(path: &Path, bytes: &[u8]) -> Result<Self> {
        let malformed = |reason: &str| Error::Checkpoint {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let (len, rest) = bytes
            .split_first_chunk::<8>()
            .ok_or_else(|| malformed("missing header"))?;
        let net_len = usize::try_from(u64::from_le_bytes(*len))
            .map_err(|_| malformed("model length overflows"))?;
        if net_len > rest.len() {
            return Err(malformed("model blob truncated"));
        }

        let (net, optim) = rest.split_at(net_len);
        Ok(Self {
            net: net.to_vec(),
            optim: optim.to_vec(),
        })
    }
}

/// File name used for `epoch`
pub fn file_name(epoch: u64) -> String {
    format!("{PREFIX}{epoch}.{EXTENSION}")
}

/// Write the checkpoint for `epoch`, creating `dir` if needed
pub fn save<P: AsRef<Path>>(dir: P, checkpoint: &Checkpoint, epoch: u64) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let path = dir.join(file_name(epoch));
    std::fs::write(&path, checkpoint.encode())?;

    tracing::info!("Saved checkpoint {}", path.display());
    Ok(path)
}

/// Load the checkpoint with the highest epoch in `dir`
///
/// Returns `(None, 0)` when the directory does not exist or holds no checkpoint,
/// so training starts from scratch.
pub fn load<P: AsRef<Path>>(dir: P) -> Result<(Option<Checkpoint>, u64)> {
    let dir = dir.as_ref();
    let Some((path, epoch)) = latest(dir)? else {
        tracing::info!("No checkpoint in {}, starting at epoch 0", dir.display());
        return Ok((None, 0));
    };

    let bytes = std::fs::read(&path)?;
    let checkpoint = Checkpoint::decode(&path, &bytes)?;

    tracing::info!("Loaded checkpoint {} (epoch {})", path.display(), epoch);
    Ok((Some(checkpoint), epoch))
}

/// Highest saved epoch in `dir`, or 0 when there is none
pub fn latest_epoch<P: AsRef<Path>>(dir: P) -> Result<u64> {
    Ok(latest(dir.as_ref())?.map_or(0, |(_, epoch)| epoch))
}

fn latest(dir: &Path) -> Result<Option<(PathBuf, u64)>> {
    if !dir.exists() {
        return Ok(None);
    }

    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let (Some(epoch), Some(key)) = (parse_epoch(name), digit_key(name)) {
            candidates.push((key, epoch, path));
        }
    }

    // Ordered by every digit in the name, then epoch, then path
    candidates.sort();
    Ok(candidates.pop().map(|(_, epoch, path)| (path, epoch)))
}

/// Number formed by concatenating all digits of `name`
fn digit_key(name: &str) -> Option<u128> {
    let digits: String = name.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Epoch between `epoch` and the extension, e.g. `model_epoch12.pth` -> 12
fn parse_epoch(name: &str) -> Option<u64> {
    let (_, tail) = name.split_once("epoch")?;
    let digits = tail.strip_suffix(&format!(".{EXTENSION}"))?;
    digits.parse().ok()
}

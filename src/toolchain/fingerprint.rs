//! Environment fingerprints for the validity token
//!
//! The tree hash identifies the source tree (its git revision), the
//! toolchain hash identifies the toolchain build. Both feed the validity
//! token, so changing either one invalidates the disk cache.

use crate::error::{PkgCacheError, PkgCacheResult};
use crate::toolchain::GoToolchain;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Hash bytes with SHA256, returning the first 12 hex chars
pub fn short_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();

    hex::encode(&result[..6])
}

/// Identify the source tree rooted at `dir`
///
/// Uses the git revision when `dir` is inside a work tree, otherwise a hash
/// of the canonical directory path.
pub fn tree_fingerprint(dir: &Path) -> PkgCacheResult<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["rev-parse", "HEAD"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output();

    if let Ok(output) = output {
        let revision = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if output.status.success() && !revision.is_empty() {
            debug!("Tree {} at revision {}", dir.display(), revision);
            return Ok(revision);
        }
    }

    let canonical = dir
        .canonicalize()
        .map_err(|e| PkgCacheError::io(format!("resolving tree directory {}", dir.display()), e))?;
    let hash = short_hash(canonical.to_string_lossy().as_bytes());
    debug!(
        "No git revision for {}, using path hash {}",
        canonical.display(),
        hash
    );
    Ok(hash)
}

/// Identify the toolchain build from its version and installation root
pub fn toolchain_fingerprint(go: &GoToolchain) -> PkgCacheResult<String> {
    let mut identity = Vec::new();

    for args in [&["version"][..], &["env", "GOROOT"][..]] {
        let output = go.exec(args)?;
        if !output.status.success() {
            return Err(PkgCacheError::command_exec(
                format!("{} {}", go.program().display(), args.join(" ")),
                String::from_utf8_lossy(&output.stderr),
            ));
        }
        identity.extend_from_slice(&output.stdout);
    }

    let hash = short_hash(&identity);
    debug!("Toolchain fingerprint {}", hash);
    Ok(hash)
}

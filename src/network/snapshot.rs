use std::{fs, io, io::Write, path::Path};

use anyhow::Context;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::network::MemoryNetwork;

impl MemoryNetwork {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        postcard::from_bytes(&bytes).with_context(|| format!("decoding {}", path.display()))
    }

    /// Like [`load`](Self::load), but a missing file yields an empty network.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match fs::metadata(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No snapshot yet, starting empty");
                Ok(Self::default())
            }
            _ => Self::load(path),
        }
    }

    /// Writes the whole network to a fresh temp file in the same directory,
    /// syncs it and renames it over `path`, so readers never see a
    /// half-written snapshot and no other file is touched.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let bytes = postcard::to_stdvec(self).context("encoding network snapshot")?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("creating temp file in {}", dir.display()))?;
        tmp.write_all(&bytes)
            .with_context(|| format!("writing {}", tmp.path().display()))?;
        tmp.as_file()
            .sync_all()
            .with_context(|| format!("syncing {}", tmp.path().display()))?;
        tmp.persist(path)
            .with_context(|| format!("replacing {}", path.display()))?;

        debug!(path = %path.display(), bytes = bytes.len(), "Saved snapshot");
        Ok(())
    }
}

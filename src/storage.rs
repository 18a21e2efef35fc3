//! File access used by the key-file codec
//!
//! The database engine supplies its own provider (sandboxed app storage,
//! virtual file systems). [`LocalFiles`] is the plain `std::fs` one.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use zeroize::Zeroizing;

/// Read granularity of [`FilesProvider::read_all`]
const READ_CHUNK: usize = 8 * 1024;

/// Whole-file access by path
pub trait FilesProvider {
    /// Create or truncate `path` for writing
    fn open_write(&self, path: &Path) -> io::Result<Box<dyn Write>>;

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read>>;

    fn exists(&self, path: &Path) -> bool;

    fn delete(&self, path: &Path) -> io::Result<()>;

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Read the whole file. Every intermediate buffer is wiped, on errors
    /// and on growth too.
    fn read_all(&self, path: &Path) -> io::Result<Zeroizing<Vec<u8>>> {
        let mut reader = self.open_read(path)?;
        let mut data = Zeroizing::new(Vec::with_capacity(READ_CHUNK));
        let mut chunk = Zeroizing::new([0u8; READ_CHUNK]);

        loop {
            let n = match reader.read(&mut chunk[..]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if data.capacity() - data.len() < n {
                // Grow by hand so the old allocation is zeroed on release
                let mut grown = Zeroizing::new(Vec::with_capacity(
                    (data.len() + n).max(data.capacity() * 2),
                ));
                grown.extend_from_slice(&data);
                data = grown;
            }
            data.extend_from_slice(&chunk[..n]);
        }

        Ok(data)
    }

    fn write_all(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let mut out = self.open_write(path)?;
        out.write_all(data)?;
        out.flush()
    }
}

/// Local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl FilesProvider for LocalFiles {
    fn open_write(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);

        // Restrictive permissions for newly created files on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        Ok(Box::new(options.open(path)?))
    }

    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(File::open(path)?))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn delete(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

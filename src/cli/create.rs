//! Key file creation

use std::path::Path;

use colored::Colorize;

use kdbx_keys::error::{KeyError, Result};
use kdbx_keys::{FilesProvider, KeyFile, LocalFiles};

use super::field;

pub fn run(path: &Path, entropy: Option<String>, force: bool) -> Result<()> {
    let files = LocalFiles;

    if files.exists(path) && !force {
        return Err(KeyError::InvalidArgument(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    let entropy = entropy.map(zeroize::Zeroizing::new);
    let key_file = KeyFile::create(&files, path, entropy.as_ref().map(|e| e.as_bytes()))?;

    println!("{} key file written", "Success:".green().bold());
    field("Path", path.display());
    field("Format", key_file.format());
    field("Fingerprint", key_file.fingerprint().as_str().cyan());
    println!();
    println!(
        "{}",
        "Keep a backup: a database locked with this file cannot be opened without it."
            .yellow()
    );

    Ok(())
}

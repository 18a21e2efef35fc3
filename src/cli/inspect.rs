//! Key file inspection

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use kdbx_keys::error::Result;
use kdbx_keys::{KeyFile, KeyFileFormat, LocalFiles};

use super::field;

#[derive(Serialize)]
struct Report<'a> {
    path: String,
    format: &'a KeyFileFormat,
    fingerprint: String,
}

pub fn run(path: &Path, json: bool) -> Result<()> {
    let key_file = KeyFile::load(&LocalFiles, path)?;

    if json {
        let report = Report {
            path: path.display().to_string(),
            format: key_file.format(),
            fingerprint: key_file.fingerprint(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    field("Path", path.display());
    field("Format", key_file.format());
    field("Fingerprint", key_file.fingerprint().as_str().cyan());

    if *key_file.format() == KeyFileFormat::Hashed {
        println!();
        println!(
            "{} not a recognised key file; its SHA-256 is used as the key",
            "Note:".yellow().bold()
        );
    }

    Ok(())
}

//! Key resizing from the command line

use std::path::Path;

use zeroize::Zeroizing;

use kdbx_keys::error::Result;
use kdbx_keys::{resize, KeyFile, LocalFiles};

use super::prompt_password;

pub fn run(length: usize, key_file: Option<&Path>) -> Result<()> {
    let derived = match key_file {
        Some(path) => {
            let key_file = KeyFile::load(&LocalFiles, path)?;
            resize(key_file.key(), length)?
        }
        None => {
            let password = prompt_password("Password: ")?;
            resize(password.as_bytes(), length)?
        }
    };

    let encoded = Zeroizing::new(hex::encode(&*derived));
    println!("{}", encoded.as_str());

    Ok(())
}

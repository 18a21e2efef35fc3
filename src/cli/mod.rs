//! CLI command implementations

pub mod cipher;
pub mod create;
pub mod derive;
pub mod inspect;

use colored::Colorize;
use zeroize::Zeroizing;

use kdbx_keys::Result;

/// Prompt for a password without echo
pub fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    let password = Zeroizing::new(rpassword::prompt_password(prompt)?);
    if password.is_empty() {
        eprintln!("{} empty password", "Warning:".yellow().bold());
    }
    Ok(password)
}

/// Print a `label: value` line with the label aligned
pub fn field(label: &str, value: impl std::fmt::Display) {
    let label = format!("{:<12}", format!("{}:", label));
    println!("{} {}", label.dimmed(), value);
}

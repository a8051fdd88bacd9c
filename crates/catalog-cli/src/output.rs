//! Output formatting helpers.

use anyhow::{Result, bail};
use colored::Colorize;
use serde::Serialize;

use catalog::ApiResponse;

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print an envelope and fail when it reports an error.
pub fn envelope<T: Serialize>(value: &T, base: &ApiResponse, pretty: bool) -> Result<()> {
    if pretty {
        json_pretty(value)?;
    } else {
        json(value)?;
    }

    if !base.is_success() {
        let detail = base.error.as_deref().unwrap_or_default();
        error(&format!("{} ({}): {}", base.message, base.code, detail));
        bail!("request failed with code {}", base.code);
    }

    Ok(())
}

/// Print a plain envelope.
pub fn response(response: &ApiResponse) -> Result<()> {
    envelope(response, response, false)
}

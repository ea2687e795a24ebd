//! The `setup` command: write connection settings to the config file.

use crate::config::{self, Config};
use crate::downstream::Transport;

/// Merge the given settings into the on-disk config.
pub async fn cmd_setup(
    config: &Config,
    url: Option<&str>,
    api_key: Option<&str>,
    root_folder: Option<&str>,
) -> anyhow::Result<()> {
    let mut updated = config.clone();
    if let Some(url) = url {
        updated.server.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(key) = api_key {
        updated.server.api_key = key.to_string();
    }
    if let Some(folder) = root_folder {
        updated.defaults.root_folder = folder.to_string();
    }

    // Catch unusable settings now rather than on the first request
    Transport::validate(&updated.server.base_url, &updated.server.api_key)?;

    config::save(&updated)?;
    if let Some(path) = config::config_path() {
        println!("✓ Settings written to {}", path.display());
    }
    Ok(())
}

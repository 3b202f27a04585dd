use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{env_subst::substitute_env, schema::WagateConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["wagate.toml", "wagate.yaml", "wagate.yml", "wagate.json"];

/// Load config from the given path (format chosen by extension).
pub fn load_config(path: &Path) -> anyhow::Result<WagateConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<WagateConfig> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("toml")
        .to_ascii_lowercase();
    let cfg = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(raw)
            .map_err(|e| anyhow::anyhow!("invalid YAML in {}: {e}", path.display()))?,
        "json" => serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("invalid JSON in {}: {e}", path.display()))?,
        _ => toml::from_str(raw)
            .map_err(|e| anyhow::anyhow!("invalid TOML in {}: {e}", path.display()))?,
    };
    Ok(cfg)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./wagate.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/wagate/wagate.{toml,yaml,yml,json}` (user-global)
///
/// Returns `WagateConfig::default()` if no config file is found.
pub fn discover_and_load() -> WagateConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    WagateConfig::default()
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "wagate") {
        let config_dir = dirs.config_dir();
        for name in CONFIG_FILENAMES {
            let p = config_dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Apply `WAGATE_*` environment overrides on top of a parsed config.
pub fn apply_env_overrides(config: &mut WagateConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

fn apply_env_overrides_with(config: &mut WagateConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(token) = lookup("WAGATE_ACCESS_TOKEN") {
        config.whatsapp.access_token = Secret::new(token);
    }
    if let Some(id) = lookup("WAGATE_PHONE_NUMBER_ID") {
        config.whatsapp.phone_number_id = id;
    }
    if let Some(token) = lookup("WAGATE_VERIFY_TOKEN") {
        config.whatsapp.verify_token = token;
    }
    if let Some(bind) = lookup("WAGATE_BIND") {
        config.server.bind = bind;
    }
    if let Some(port) = lookup("WAGATE_PORT") {
        match port.parse() {
            Ok(p) => config.server.port = p,
            Err(_) => warn!(port, "ignoring invalid WAGATE_PORT"),
        }
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use {secrecy::ExposeSecret, std::io::Write};

    use super::*;

    #[test]
    fn loads_toml_config() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9100\n\n[whatsapp]\nphone_number_id = \"1555\"\nverify_token = \"vt\""
        )
        .unwrap();

        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.whatsapp.phone_number_id, "1555");
        assert_eq!(cfg.whatsapp.verify_token, "vt");
    }

    #[test]
    fn loads_yaml_config() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "whatsapp:\n  phone_number_id: \"777\"").unwrap();

        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.whatsapp.phone_number_id, "777");
    }

    #[test]
    fn rejects_malformed_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server\nport=").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn env_overrides_replace_fields() {
        let mut cfg = WagateConfig::default();
        apply_env_overrides_with(&mut cfg, |name| match name {
            "WAGATE_ACCESS_TOKEN" => Some("envtok".into()),
            "WAGATE_PORT" => Some("9001".into()),
            _ => None,
        });
        assert_eq!(cfg.whatsapp.access_token.expose_secret(), "envtok");
        assert_eq!(cfg.server.port, 9001);
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let mut cfg = WagateConfig::default();
        apply_env_overrides_with(&mut cfg, |name| match name {
            "WAGATE_PORT" => Some("not-a-port".into()),
            _ => None,
        });
        assert_eq!(cfg.server.port, 8080);
    }
}

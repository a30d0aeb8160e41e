use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use bargainer_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG};

struct ConfigField {
    key_path: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult {
                exit_code: EXIT_CONFIG,
                output: format!("config validation failed: {error}"),
            };
        }
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines =
        vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn fields(config: &AppConfig) -> Vec<ConfigField> {
    vec![
        ConfigField {
            key_path: "server.bind_address",
            value: config.server.bind_address.clone(),
            env_keys: &["BARGAINER_SERVER_BIND_ADDRESS"],
        },
        ConfigField {
            key_path: "server.port",
            value: config.server.port.to_string(),
            env_keys: &["BARGAINER_SERVER_PORT", "PORT"],
        },
        ConfigField {
            key_path: "server.graceful_shutdown_secs",
            value: config.server.graceful_shutdown_secs.to_string(),
            env_keys: &["BARGAINER_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        },
        ConfigField {
            key_path: "negotiation.target_fraction",
            value: config.negotiation.target_fraction.to_string(),
            env_keys: &["BARGAINER_NEGOTIATION_TARGET_FRACTION"],
        },
        ConfigField {
            key_path: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["BARGAINER_LOGGING_LEVEL", "BARGAINER_LOG_LEVEL"],
        },
        ConfigField {
            key_path: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["BARGAINER_LOGGING_FORMAT", "BARGAINER_LOG_FORMAT"],
        },
    ]
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("config file"));
            return format!("file ({})", file_path.display());
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use toml::Value;

    use super::{contains_path, field_source};

    #[test]
    fn file_keys_are_attributed_to_the_file() {
        let doc: Value = "[negotiation]\ntarget_fraction = 0.9\n".parse().expect("valid toml");

        assert!(contains_path(&doc, "negotiation.target_fraction"));
        assert!(!contains_path(&doc, "server.port"));
        assert_eq!(
            field_source(
                "negotiation.target_fraction",
                &["BARGAINER_TEST_UNSET_KEY"],
                Some(&doc),
                Some(Path::new("bargainer.toml")),
            ),
            "file (bargainer.toml)"
        );
        assert_eq!(
            field_source("server.port", &["BARGAINER_TEST_UNSET_KEY"], Some(&doc), None),
            "default"
        );
    }
}

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use cadastro_core::config::{resolve_config_path, AppConfig, LoadOptions, ENV_BINDINGS};
use toml::Value;

pub fn run(options: &LoadOptions) -> Result<String, String> {
    let config = AppConfig::load(options.clone())
        .map_err(|error| format!("config validation failed: {error}"))?;

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines =
        vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key, env_keys) in ENV_BINDINGS {
        let value = config.setting(key).unwrap_or_else(|| "<unknown>".to_string());
        let source =
            field_source(key, env_keys, config_file_doc.as_ref(), config_file_path.as_deref());
        lines.push(render_line(key, &value, source));
    }

    Ok(lines.join("\n"))
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

    use super::{contains_path, field_source, render_line};

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc: Value = "[server]\nport = 9000\n".parse().expect("toml");

        assert!(contains_path(&doc, "server.port"));
        assert!(!contains_path(&doc, "server.bind_address"));
        assert!(!contains_path(&doc, "database.url"));
    }

    #[test]
    fn field_source_prefers_file_over_default() {
        let doc: Value = "[logging]\nlevel = \"debug\"\n".parse().expect("toml");

        let source = field_source(
            "logging.level",
            &["CADASTRO_TEST_UNSET_LEVEL"],
            Some(&doc),
            Some(Path::new("cadastro.toml")),
        );
        assert_eq!(source, "file (cadastro.toml)");

        let source = field_source(
            "logging.format",
            &["CADASTRO_TEST_UNSET_FORMAT"],
            Some(&doc),
            Some(Path::new("cadastro.toml")),
        );
        assert_eq!(source, "default");
    }

    #[test]
    fn render_line_formats_key_value_and_source() {
        assert_eq!(
            render_line("server.port", "8081", "default".to_string()),
            "- server.port = 8081 (source: default)"
        );
    }
}

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;

const DEFAULT_PORT: i32 = 8000;

#[derive(Parser, Debug)]
#[command(name = "bookmarks")]
#[command(about = "Runs the bookmarks service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bookmarks")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

/// Production hides failure details and quiets request logging; every other value of the
/// environment setting counts as development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum RuntimeMode {
    Production,
    #[default]
    Development,
}

impl From<String> for RuntimeMode {
    fn from(value: String) -> Self {
        match value.trim() {
            "production" => RuntimeMode::Production,
            _ => RuntimeMode::Development,
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeMode::Production => write!(f, "production"),
            RuntimeMode::Development => write!(f, "development"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    port: i32,
    #[serde(default)]
    environment: RuntimeMode,
    #[serde(default)]
    public_url: Option<String>,
    #[serde(default)]
    pub strict_validation: bool,
}

impl Default for App {
    fn default() -> Self {
        App {
            port: DEFAULT_PORT,
            environment: RuntimeMode::default(),
            public_url: None,
            strict_validation: false,
        }
    }
}

impl App {
    pub fn new(port: i32, environment: RuntimeMode) -> Self {
        App {
            port,
            environment,
            ..App::default()
        }
    }

    pub fn with_public_url(mut self, url: &str) -> Self {
        self.public_url = Some(url.to_owned());
        self
    }

    pub fn get_port(&self) -> i32 {
        self.port
    }

    pub fn mode(&self) -> RuntimeMode {
        self.environment
    }

    pub fn is_production(&self) -> bool {
        self.environment == RuntimeMode::Production
    }

    pub fn public_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_owned(),
            None => format!("http://localhost:{}", self.port),
        }
    }

    /// Canonical retrieval URL of a bookmark, used for the `Location` header.
    pub fn location_for(&self, id: &str) -> String {
        format!("{}/bookmarks/{}", self.public_url(), id)
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    pub app: App,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let cfg = Config::load_config(path)?;
        Ok(cfg)
    }

    /// Resolves configuration for startup: an explicit path wins, then the default config
    /// file if present, then the process environment.
    pub fn resolve(config_path: Option<&str>) -> Result<Self> {
        if let Some(path) = config_path {
            return Config::new(path).with_context(|| format!("loading config from {}", path));
        }

        let default_path = default_config_path();
        if default_path.exists() {
            let path = default_path.to_string_lossy();
            return Config::new(&path).with_context(|| format!("loading config from {}", path));
        }

        Config::from_env()
    }

    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<i32>()
                .with_context(|| format!("invalid PORT value {:?}", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        let environment = env::var("NODE_ENV")
            .map(RuntimeMode::from)
            .unwrap_or_default();

        let strict_validation = env::var("STRICT_VALIDATION")
            .map(|v| matches!(v.trim(), "true" | "1"))
            .unwrap_or(false);

        Ok(Config {
            app: App {
                port,
                environment,
                public_url: env::var("PUBLIC_URL").ok().filter(|u| !u.is_empty()),
                strict_validation,
            },
        })
    }

    fn load_config(path: &str) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)?;
        let yaml_with_env = Config::substitute_env_vars(&yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    /// Expands `${VAR}` and `${VAR:-default}` placeholders from the environment. A variable
    /// with no default that is unset makes the whole config invalid.
    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut expanded = String::with_capacity(yaml_str.len());
        let mut rest = yaml_str;

        while let Some(start) = rest.find("${") {
            let Some(len) = rest[start..].find('}') else {
                break;
            };

            let placeholder = &rest[start + 2..start + len];
            let (name, fallback) = match placeholder.split_once(":-") {
                Some((name, fallback)) => (name, Some(fallback)),
                None => (placeholder, None),
            };

            let value = match (env::var(name), fallback) {
                (Ok(value), _) => value,
                (Err(_), Some(fallback)) => fallback.to_owned(),
                (Err(_), None) => bail!("environment variable {} is not set", name),
            };

            expanded.push_str(&rest[..start]);
            expanded.push_str(&value);
            rest = &rest[start + len + 1..];
        }

        expanded.push_str(rest);
        Ok(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_runtime_mode_from_string() {
        assert_eq!(RuntimeMode::from("production".to_string()), RuntimeMode::Production);
        assert_eq!(RuntimeMode::from("development".to_string()), RuntimeMode::Development);
        assert_eq!(RuntimeMode::from("staging".to_string()), RuntimeMode::Development);
        assert_eq!(RuntimeMode::from(String::new()), RuntimeMode::Development);
    }

    #[test]
    fn test_substitute_env_vars_uses_default() {
        let out = Config::substitute_env_vars(
            "port: ${BOOKMARKS_TEST_UNSET_PORT_VAR:-9090}\nname: x",
        )
        .unwrap();
        assert_eq!(out, "port: 9090\nname: x");
    }

    #[test]
    fn test_substitute_env_vars_leaves_unterminated_placeholder() {
        let out = Config::substitute_env_vars("port: ${BROKEN").unwrap();
        assert_eq!(out, "port: ${BROKEN");
    }

    #[test]
    fn test_substitute_env_vars_rejects_unset_variable_without_default() {
        let err = Config::substitute_env_vars("port: ${BOOKMARKS_TEST_UNSET_PORT_VAR}")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "environment variable BOOKMARKS_TEST_UNSET_PORT_VAR is not set"
        );
    }

    #[test]
    fn test_substitute_env_vars_expands_several_placeholders() {
        let out = Config::substitute_env_vars(
            "a: ${BOOKMARKS_TEST_UNSET_A:-1}\nb: ${BOOKMARKS_TEST_UNSET_B:-two}\n",
        )
        .unwrap();
        assert_eq!(out, "a: 1\nb: two\n");
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "app:\n  port: ${{BOOKMARKS_TEST_UNSET_PORT_VAR:-8123}}\n  environment: production\n  public_url: https://marks.example.com/\n  strict_validation: true"
        )
        .unwrap();

        let cfg = Config::new(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.app.get_port(), 8123);
        assert!(cfg.app.is_production());
        assert!(cfg.app.strict_validation);
        assert_eq!(
            cfg.app.location_for("abc"),
            "https://marks.example.com/bookmarks/abc"
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "app:\n  port: 8000").unwrap();

        let cfg = Config::new(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.app.mode(), RuntimeMode::Development);
        assert!(!cfg.app.strict_validation);
        assert_eq!(cfg.app.location_for("1"), "http://localhost:8000/bookmarks/1");
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        assert!(Config::new("/nonexistent/bookmarks/config.yaml").is_err());
        assert!(Config::resolve(Some("/nonexistent/bookmarks/config.yaml")).is_err());
    }
}

use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;

pub const DEFAULT_API_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "anthropic/claude-haiku-4.5";

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    /// Defaults, overlaid by `.analystrc`, overlaid by the environment.
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                map.extend(parse_rc_lines(reader.lines().map_while(Result::ok)));
            }
        }

        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    /// Defaults plus explicit overrides, ignoring the rc file and environment.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = default_map();
        map.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        Self { inner: map, config_path: default_config_path() }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse::<u64>().ok())
    }

    pub fn api_base_url(&self) -> String {
        self.get("API_BASE_URL")
            .filter(|v| !v.trim().is_empty() && v != "default")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    pub fn api_key(&self) -> Option<String> {
        self.get("OPENROUTER_API_KEY").filter(|k| !k.trim().is_empty())
    }

    pub fn model(&self) -> String {
        self.get("DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn cache_path(&self) -> PathBuf {
        self.get_path("CACHE_PATH")
    }

    pub fn history_path(&self) -> PathBuf {
        self.get_path("HISTORY_PATH")
    }

    fn get_path(&self, key: &str) -> PathBuf {
        self.get(key)
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join("ai_data_analyst"))
    }
}

fn parse_rc_lines<I>(lines: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = String>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            line.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        })
        .collect()
}

fn is_config_key(k: &str) -> bool {
    // Known keys, plus ANALYST_* for forward-compat
    const KEYS: &[&str] = &[
        "OPENROUTER_API_KEY",
        "API_BASE_URL",
        "DEFAULT_MODEL",
        "MAX_TOKENS",
        "REQUEST_TIMEOUT",
        "DISABLE_STREAMING",
        "CACHE_PATH",
        "CACHE_LENGTH",
        "HISTORY_PATH",
        "HISTORY_LENGTH",
        "SAMPLE_ROWS",
        "PRETTIFY_MARKDOWN",
    ];

    KEYS.contains(&k) || k.starts_with("ANALYST_")
}

fn config_dir() -> PathBuf {
    BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("ai_data_analyst")
}

fn default_config_path() -> PathBuf {
    config_dir().join(".analystrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    // Paths
    let temp = env::temp_dir().join("ai_data_analyst");
    m.insert(
        "CACHE_PATH".into(),
        temp.join("plan_cache").to_string_lossy().into_owned(),
    );
    m.insert(
        "HISTORY_PATH".into(),
        config_dir().join("history").to_string_lossy().into_owned(),
    );

    // Numbers
    m.insert("CACHE_LENGTH".into(), "100".into());
    m.insert("HISTORY_LENGTH".into(), "20".into());
    m.insert("REQUEST_TIMEOUT".into(), "60".into());
    m.insert("MAX_TOKENS".into(), "1024".into());
    m.insert("SAMPLE_ROWS".into(), "5".into());

    // Strings
    m.insert("DEFAULT_MODEL".into(), DEFAULT_MODEL.into());
    m.insert("API_BASE_URL".into(), "default".into());

    // Bools as strings
    m.insert("DISABLE_STREAMING".into(), "false".into());
    m.insert("PRETTIFY_MARKDOWN".into(), "true".into());

    m
}

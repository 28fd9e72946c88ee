use std::path::Path;

use tracing::info;

use crate::core::error::QuarryError;

// ---------------------------------------------------------------------------
// Config: INI-style config loader (config.ini), read once at startup
// ---------------------------------------------------------------------------

/// `[database]` section: PostgreSQL connection parameters.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "search_engine".to_string(),
            user: "postgres".to_string(),
            password: "admin".to_string(),
        }
    }
}

/// `[spider]` section: crawl bounds and HTTP client behavior.
#[derive(Debug, Clone)]
pub struct SpiderConfig {
    pub start_url: String,
    /// Maximum fetch hops from the seed; the seed itself is depth 0.
    pub max_depth: usize,
    pub thread_count: usize,
    /// Single connect+read deadline per request, in seconds.
    pub request_timeout: u64,
    pub user_agent: String,
    /// Per-worker pause after each task, in milliseconds.
    pub delay_between_requests: u64,
}

impl Default for SpiderConfig {
    fn default() -> Self {
        Self {
            start_url: "https://example.com".to_string(),
            max_depth: 1,
            thread_count: 2,
            request_timeout: 30,
            user_agent: "SearchEngineBot/1.0".to_string(),
            delay_between_requests: 100,
        }
    }
}

/// `[search_server]` section: HTTP front-end bind address and limits.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_results: i64,
    pub threads: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_results: 10,
            threads: 4,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub spider: SpiderConfig,
    pub search_server: ServerConfig,
}

impl Config {
    /// Read and parse an INI config file. An unreadable file is a startup
    /// failure; missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, QuarryError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| QuarryError::Config(format!("cannot open {}: {}", path.display(), e)))?;
        let config = Self::parse(&contents);
        info!("config loaded from {}", path.display());
        Ok(config)
    }

    /// Parse INI text: `[section]` headers, `key=value` pairs, `;` comments
    /// (full-line or trailing). Unknown sections and keys are ignored, as are
    /// values that fail to parse as numbers.
    pub fn parse(contents: &str) -> Self {
        let mut config = Self::default();
        let mut section = String::new();

        for raw in contents.lines() {
            let line = match raw.split_once(';') {
                Some((head, _comment)) => head,
                None => raw,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                section = line[1..line.len() - 1].trim().to_string();
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match (section.as_str(), key) {
                ("database", "host") => config.database.host = value.to_string(),
                ("database", "port") => set_num(&mut config.database.port, value),
                ("database", "dbname") => config.database.dbname = value.to_string(),
                ("database", "user") => config.database.user = value.to_string(),
                ("database", "password") => config.database.password = value.to_string(),

                ("spider", "start_url") => config.spider.start_url = value.to_string(),
                ("spider", "max_depth") => set_num(&mut config.spider.max_depth, value),
                ("spider", "thread_count") => set_num(&mut config.spider.thread_count, value),
                ("spider", "request_timeout") => set_num(&mut config.spider.request_timeout, value),
                ("spider", "user_agent") => config.spider.user_agent = value.to_string(),
                ("spider", "delay_between_requests") => {
                    set_num(&mut config.spider.delay_between_requests, value)
                }

                ("search_server", "host") => config.search_server.host = value.to_string(),
                ("search_server", "port") => set_num(&mut config.search_server.port, value),
                ("search_server", "max_results") => {
                    set_num(&mut config.search_server.max_results, value)
                }
                ("search_server", "threads") => set_num(&mut config.search_server.threads, value),

                _ => {}
            }
        }

        config
    }
}

fn set_num<T: std::str::FromStr>(slot: &mut T, value: &str) {
    if let Ok(parsed) = value.parse() {
        *slot = parsed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let ini = r#"
; search engine configuration
[database]
host = db.internal
port = 5433
dbname = quarry
user = crawler
password = secret

[spider]
start_url = http://start.test/
max_depth = 3
thread_count = 8
request_timeout = 10
user_agent = QuarryBot/2.0
delay_between_requests = 0

[search_server]
host = 127.0.0.1
port = 9090
max_results = 25
threads = 2
"#;
        let config = Config::parse(ini);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 5433);
        assert_eq!(config.database.dbname, "quarry");
        assert_eq!(config.spider.start_url, "http://start.test/");
        assert_eq!(config.spider.max_depth, 3);
        assert_eq!(config.spider.thread_count, 8);
        assert_eq!(config.spider.delay_between_requests, 0);
        assert_eq!(config.search_server.port, 9090);
        assert_eq!(config.search_server.max_results, 25);
        assert_eq!(config.search_server.threads, 2);
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let config = Config::parse("[spider]\nmax_depth = 5\n");
        assert_eq!(config.spider.max_depth, 5);
        assert_eq!(config.spider.thread_count, 2);
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.search_server.host, "0.0.0.0");
    }

    #[test]
    fn test_trailing_comments_and_whitespace() {
        let config = Config::parse("[database]\n  host =  10.0.0.1   ; primary replica\n");
        assert_eq!(config.database.host, "10.0.0.1");
    }

    #[test]
    fn test_unknown_sections_and_keys_ignored() {
        let config = Config::parse("[future]\nflux = 1\n[database]\nwarp = yes\nport = 1234\n");
        assert_eq!(config.database.port, 1234);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.ini")).unwrap_err();
        assert!(matches!(err, QuarryError::Config(_)));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[search_server]\nport = 8181\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.search_server.port, 8181);
    }
}

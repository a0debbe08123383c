// Command line and environment configuration.
// Parses flags with clap and resolves them into the runtime Config.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use tracing::warn;

use crate::cache::{
    self, CachePolicy, DEFAULT_MAX_BYTES, DEFAULT_MAX_ENTRIES, DEFAULT_TTL, ResponseCache,
};
use crate::github::GITHUB_API_BASE;
use crate::state::{DEFAULT_DEBOUNCE, PageSize, SortKey, parse_page_size};

/// Search GitHub repositories from the terminal.
#[derive(Parser, Debug)]
#[command(name = "reposcout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run a single search, print the table to stdout, and exit
    #[arg(short, long)]
    pub query: Option<String>,

    /// Rows displayed (5, 10, 20, ... 100)
    #[arg(short = 'n', long, default_value = "30", value_parser = parse_page_size)]
    pub per_page: PageSize,

    /// Column to order displayed rows by
    #[arg(short, long, value_enum, default_value_t = SortKey::Stars)]
    pub sort: SortKey,

    /// GitHub API base URL
    #[arg(long, env = "REPOSCOUT_API_URL", default_value = GITHUB_API_BASE)]
    pub api_url: String,

    /// Token for authenticated requests (higher rate limit)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Idle time after typing before a search fires, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE.as_millis() as u64)]
    pub debounce_ms: u64,

    /// Lifetime of cached responses in seconds (0 keeps them forever)
    #[arg(long, default_value_t = DEFAULT_TTL.as_secs())]
    pub cache_ttl_secs: u64,

    /// Maximum cached responses (0 for no limit)
    #[arg(long, default_value_t = DEFAULT_MAX_ENTRIES)]
    pub cache_max_entries: usize,

    /// Maximum size of the cache file in bytes (0 for no limit)
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES)]
    pub cache_max_bytes: usize,

    /// Location of the response cache file
    #[arg(long, env = "REPOSCOUT_CACHE_FILE")]
    pub cache_file: Option<PathBuf>,

    /// Keep responses in memory only
    #[arg(long)]
    pub no_cache: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub query: Option<String>,
    pub page_size: PageSize,
    pub sort_key: SortKey,
    pub api_url: String,
    pub token: Option<String>,
    pub debounce: Duration,
    pub cache_policy: CachePolicy,
    /// `None` keeps the cache in memory.
    pub cache_path: Option<PathBuf>,
    pub no_cache: bool,
    pub verbose: u8,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let cache_path = if cli.no_cache {
            None
        } else {
            cli.cache_file.or_else(cache::search_cache_path)
        };

        Self {
            query: cli.query,
            page_size: cli.per_page,
            sort_key: cli.sort,
            api_url: cli.api_url,
            token: cli.token.filter(|t| !t.is_empty()),
            debounce: Duration::from_millis(cli.debounce_ms),
            cache_policy: CachePolicy {
                ttl: (cli.cache_ttl_secs > 0).then(|| Duration::from_secs(cli.cache_ttl_secs)),
                max_entries: cli.cache_max_entries,
                max_bytes: cli.cache_max_bytes,
            },
            cache_path,
            no_cache: cli.no_cache,
            verbose: cli.verbose,
        }
    }
}

impl Config {
    /// Open the response cache this configuration points at.
    pub fn open_cache(&self) -> ResponseCache {
        match &self.cache_path {
            Some(path) => ResponseCache::open(path.clone(), self.cache_policy),
            None => {
                if !self.no_cache {
                    warn!("no cache directory available, caching in memory only");
                }
                ResponseCache::in_memory(self.cache_policy)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["reposcout"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().into()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--no-cache"]);
        assert_eq!(config.page_size.get(), 30);
        assert_eq!(config.sort_key, SortKey::Stars);
        assert_eq!(config.debounce, DEFAULT_DEBOUNCE);
        assert_eq!(config.debounce, Duration::from_millis(2000));
        assert_eq!(config.cache_policy.ttl, Some(DEFAULT_TTL));
        assert_eq!(config.cache_policy, CachePolicy::default());
        assert!(config.cache_path.is_none());
        assert!(config.query.is_none());
    }

    #[test]
    fn test_headless_flags() {
        let config = parse(&[
            "--query", "react", "-n", "10", "--sort", "created", "--no-cache",
        ]);
        assert_eq!(config.query.as_deref(), Some("react"));
        assert_eq!(config.page_size.get(), 10);
        assert_eq!(config.sort_key, SortKey::Created);
    }

    #[test]
    fn test_rejects_unlisted_page_size() {
        let result = Cli::try_parse_from(["reposcout", "--per-page", "15"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_ttl_never_expires() {
        let config = parse(&[
            "--cache-ttl-secs",
            "0",
            "--cache-max-entries",
            "0",
            "--cache-max-bytes",
            "0",
        ]);
        assert_eq!(config.cache_policy.ttl, None);
        assert_eq!(config.cache_policy.max_entries, 0);
        assert_eq!(config.cache_policy.max_bytes, 0);
    }

    #[test]
    fn test_explicit_cache_file() {
        let config = parse(&["--cache-file", "/tmp/reposcout-test.json"]);
        assert_eq!(
            config.cache_path,
            Some(PathBuf::from("/tmp/reposcout-test.json"))
        );
    }
}

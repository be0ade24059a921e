use clap::Parser;
use std::path::PathBuf;

use crate::feed::{DEFAULT_ENDPOINT, FeedSource};

/// Default feed server when neither `--server` nor `LOGVIEW_SERVER` is set.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

// Build version with target info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "HTTP:   ureq 2\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Time-synchronized transcript and image log viewer
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Log file name to request from the feed server (e.g. 2024-01-01.json)
    #[arg(value_name = "LOG")]
    pub log_name: Option<String>,

    /// Feed server base URL
    #[arg(short = 's', long = "server", value_name = "URL", env = "LOGVIEW_SERVER", default_value = DEFAULT_SERVER)]
    pub server: String,

    /// API endpoint segment: requests go to <URL>/api/<ENDPOINT>/<LOG>
    #[arg(short = 'e', long = "endpoint", value_name = "ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Read the feed from a local JSON file instead of the server
    #[arg(short = 'f', long = "file", value_name = "FILE", conflicts_with = "log_name")]
    pub file: Option<PathBuf>,

    /// Enable debug logging to file (default: logview.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom data directory for the log file (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

impl Args {
    /// Feed to open at startup, if any.
    pub fn feed_source(&self) -> Option<FeedSource> {
        if let Some(path) = &self.file {
            return Some(FeedSource::File(path.clone()));
        }
        self.log_name
            .as_ref()
            .map(|name| FeedSource::http(&self.server, &self.endpoint, name))
    }

    /// 0 = warn, 1 = info, 2 = debug, 3+ = trace
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_source_from_log_name() {
        let args = Args::try_parse_from(["logview", "-s", "http://box:9000", "day.json"]).unwrap();
        assert_eq!(
            args.feed_source(),
            Some(FeedSource::http("http://box:9000", "gobi-log", "day.json"))
        );
        assert_eq!(args.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_file_source() {
        let args = Args::try_parse_from(["logview", "--file", "/tmp/day.json", "-vv"]).unwrap();
        assert_eq!(args.feed_source(), Some(FeedSource::File(PathBuf::from("/tmp/day.json"))));
        assert_eq!(args.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_file_conflicts_with_log_name() {
        assert!(Args::try_parse_from(["logview", "--file", "a.json", "b.json"]).is_err());
    }

    #[test]
    fn test_no_source() {
        let args = Args::try_parse_from(["logview", "-e", "other-log"]).unwrap();
        assert_eq!(args.endpoint, "other-log");
        assert!(args.feed_source().is_none());
    }

    #[test]
    fn test_log_flag_optional_value() {
        let args = Args::try_parse_from(["logview", "--log"]).unwrap();
        assert_eq!(args.log_file, Some(None));
        let args = Args::try_parse_from(["logview", "--log=out.log"]).unwrap();
        assert_eq!(args.log_file, Some(Some(PathBuf::from("out.log"))));
    }
}

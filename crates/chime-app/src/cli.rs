use std::path::PathBuf;

use clap::Parser;

/// Chime: a desktop chat client.
#[derive(Parser, Debug, Default)]
#[command(name = "chime", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory holding files and chat logs.
    #[arg(short = 'd', long)]
    pub data_dir: Option<PathBuf>,

    /// Page to load instead of the configured start URL.
    #[arg(long)]
    pub url: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_flags_are_optional() {
        let args = Args::try_parse_from(["chime"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.log_level.is_none());
        assert!(args.data_dir.is_none());
        assert!(args.url.is_none());
    }

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from([
            "chime",
            "--config",
            "/tmp/chime.toml",
            "--log-level",
            "debug",
            "-d",
            "/tmp/data",
            "--url",
            "chime://localhost/dev.html",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/chime.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.data_dir, Some(PathBuf::from("/tmp/data")));
        assert_eq!(args.url.as_deref(), Some("chime://localhost/dev.html"));
    }
}

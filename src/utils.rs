use chrono::{DateTime, Utc};
use tracing_subscriber::EnvFilter;

pub fn fmt_date(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// Formats a blame `*-time` value (seconds since the epoch).
pub fn fmt_epoch(secs: &str) -> Option<String> {
    let secs = secs.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0).map(fmt_date)
}

/// Logs to stderr. `RUST_LOG` wins over the `-v` count.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_formatting() {
        assert_eq!(fmt_epoch("0").as_deref(), Some("1970-01-01"));
        assert_eq!(fmt_epoch("1700000000").as_deref(), Some("2023-11-14"));
        assert_eq!(fmt_epoch("soon"), None);
    }
}

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// HTTP client internals stay at `warn` unless a filter names them.
const QUIET_DEPENDENCIES: [&str; 3] = ["hyper", "hyper_util", "reqwest"];

/// Installs the global fmt subscriber. `BARRAGE_LOG`, then `RUST_LOG`,
/// override the level chosen by `verbose`.
pub fn init_logging(verbose: bool, no_color: bool) {
    let requested = std::env::var("BARRAGE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok();
    let filter = build_filter(verbose, requested.as_deref());

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_target(false)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

fn build_filter(verbose: bool, requested: Option<&str>) -> EnvFilter {
    let directives = filter_directives(verbose, requested);
    EnvFilter::try_new(&directives).unwrap_or_else(|err| {
        eprintln!("Ignoring log filter '{}': {}", directives, err);
        EnvFilter::new(filter_directives(verbose, None))
    })
}

/// A user filter is taken as is; otherwise the default level plus
/// [`QUIET_DEPENDENCIES`] at `warn`.
fn filter_directives(verbose: bool, requested: Option<&str>) -> String {
    if let Some(value) = requested.map(str::trim).filter(|value| !value.is_empty()) {
        return value.to_owned();
    }
    let level = if verbose { "debug" } else { "info" };
    let mut directives = vec![level.to_owned()];
    directives.extend(
        QUIET_DEPENDENCIES
            .iter()
            .map(|target| format!("{}=warn", target)),
    );
    directives.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(false, true);
        init_logging(true, true);
    }

    #[test]
    fn default_filter_quiets_the_http_client() {
        assert_eq!(
            filter_directives(false, None),
            "info,hyper=warn,hyper_util=warn,reqwest=warn"
        );
        assert!(filter_directives(true, Some("  ")).starts_with("debug,"));
    }

    #[test]
    fn explicit_filter_wins() {
        assert_eq!(
            filter_directives(true, Some("barrage=trace")),
            "barrage=trace"
        );
    }

    #[test]
    fn unparsable_filter_falls_back_to_the_default() {
        let filter = build_filter(false, Some("barrage=notalevel"));
        assert_eq!(
            filter.to_string(),
            EnvFilter::new(filter_directives(false, None)).to_string()
        );
    }
}

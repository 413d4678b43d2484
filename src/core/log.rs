use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber. `verbose` raises this crate to `debug`;
/// `json` switches to machine readable output for server deployments.
/// A valid `RUST_LOG` replaces the built-in levels entirely.
pub fn init_logging(verbose: bool, json: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (app_filter, env_filter) = filters(verbose, directives.as_deref());

    let registry = tracing_subscriber::registry()
        .with(app_filter)
        .with(env_filter);

    if json {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).without_time())
            .init();
    }
}

/// Exactly one of the two filters is set.
fn filters(verbose: bool, directives: Option<&str>) -> (Option<Targets>, Option<EnvFilter>) {
    if let Some(env_filter) = directives.and_then(|d| EnvFilter::try_new(d).ok()) {
        return (None, Some(env_filter));
    }

    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let app_filter = Targets::new()
        .with_target("fxview", level)
        .with_target("tower_http", level)
        .with_default(LevelFilter::WARN);
    (Some(app_filter), None)
}

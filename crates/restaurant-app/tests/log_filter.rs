use std::{env, fs};

use restaurant_app::observability::{self, FilterSource};
use tracing::Level;

#[test]
fn rust_log_overrides_configured_level() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("restaurant.toml");
    fs::write(
        &path,
        r#"
[auth.token]
signing_key = "PRIVATE_KEY_DONT_SHARE_0123456789abcdef"

[logging]
level = "info"
"#,
    )
    .expect("write toml");

    unsafe {
        env::set_var("RUST_LOG", "debug");
    }

    restaurant_app::bootstrap::start(path.to_str()).expect("app should start");
    assert!(tracing::enabled!(Level::DEBUG));

    // A later reload with the configured level keeps RUST_LOG in charge.
    assert_eq!(
        observability::apply_logging_level("warn"),
        FilterSource::Environment
    );
    assert!(tracing::enabled!(Level::DEBUG));

    unsafe {
        env::remove_var("RUST_LOG");
    }

    // Without RUST_LOG the configured level applies.
    assert_eq!(
        observability::apply_logging_level("warn"),
        FilterSource::Config
    );
    assert!(!tracing::enabled!(Level::INFO));
    assert!(tracing::enabled!(Level::WARN));
}

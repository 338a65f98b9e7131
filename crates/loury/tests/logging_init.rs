//! Global subscriber installation. Kept in its own test binary so no other
//! test races for the global dispatcher.

use loury::config::LoggingConfig;
use loury::{Error, logging};

#[test]
fn init_installs_once() {
    let config = LoggingConfig {
        filter: "loury=debug".to_string(),
        json: false,
    };

    logging::init(&config).expect("first init installs the subscriber");
    tracing::debug!(message = "test.after_init");

    let second = logging::init(&config);
    assert!(
        matches!(second, Err(Error::Logging(_))),
        "second init must not replace the subscriber: {second:?}"
    );
}

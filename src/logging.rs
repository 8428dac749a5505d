//=========================================================================
// Logging
//=========================================================================
//
// Installs the `log` backend for the current platform.
//
// Android: logcat through `android_logger` (tag "linderdaum").
// Elsewhere: `env_logger`, with `RUST_LOG` overriding the given level.
//
// Log targets used across the crate:
//   bridge::deploy   asset deployment
//   bridge::input    touch and key translation
//   bridge::native   engine notifications and lifecycle
//   platform         window and event loop
//
//=========================================================================

use log::LevelFilter;

/// Tag shown in logcat.
pub const LOG_TAG: &str = "linderdaum";

/// Installs the platform logger. Later calls are ignored.
#[cfg(target_os = "android")]
pub fn init(level: LevelFilter) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(level)
            .with_tag(LOG_TAG),
    );
}

/// Installs the platform logger. Later calls are ignored.
#[cfg(not(target_os = "android"))]
pub fn init(level: LevelFilter) {
    let _ = env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init(LevelFilter::Debug);
        init(LevelFilter::Trace);
        log::info!(target: "bridge::native", "logger installed");
    }
}

//! Logging setup utilities for the chat relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Cargo package names use `-` while tracing targets use `_`, so the package
/// name is normalized before it is turned into a directive.
pub fn default_directive(
    package_name: &str,
    binary_name: &str,
    default_log_level: &str,
) -> String {
    format!(
        "{}={},{}={}",
        package_name.replace('-', "_"),
        default_log_level,
        binary_name.replace('-', "_"),
        default_log_level
    )
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// Logging is enabled for both the library crate and the binary. The level can
/// be overridden with the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `package_name` - The package that owns the binary (e.g., `env!("CARGO_PKG_NAME")`)
/// * `binary_name` - The name of the binary (e.g., "server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use hubbub_shared::logger::setup_logger;
///
/// setup_logger("hubbub-server", "server", "debug");
/// ```
pub fn setup_logger(package_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                default_directive(package_name, binary_name, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_normalizes_package_name() {
        // テスト項目: パッケージ名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let package_name = "hubbub-server";

        // when (操作):
        let directive = default_directive(package_name, "server", "debug");

        // then (期待する結果):
        assert_eq!(directive, "hubbub_server=debug,server=debug");
    }
}

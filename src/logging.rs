//! `env_logger` setup for library users that have no logger of their own.

/// Installs an `env_logger` configured from `RUST_LOG`.
///
/// Fails when a logger is already installed.
pub fn init_env_logger() -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .try_init()
}

//! Build metadata reported by the health check and attached to every
//! log record.

/// The crate version of the directory service.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The source revision, if `DIRECTORY_REVISION` was set at build time.
pub const REVISION: Option<&str> = option_env!("DIRECTORY_REVISION");

/// The build timestamp, if `BUILD_TIMESTAMP` was set at build time.
pub const BUILD_TIMESTAMP: Option<&str> = option_env!("BUILD_TIMESTAMP");

/// The name the service reports about itself.
pub const SERVICE_NAME: &str = "directory";

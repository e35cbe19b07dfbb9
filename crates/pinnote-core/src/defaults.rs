//! Centralized default constants for pinnote.
//!
//! **This module is the single source of truth** for shared default values.
//! The server, the store backends, and the client reference these constants
//! instead of defining their own magic numbers.

// =============================================================================
// NOTE LIMITS
// =============================================================================

/// Maximum title length, counted in Unicode scalar values after trimming.
pub const TITLE_MAX_CHARS: usize = 100;

// =============================================================================
// SERVER
// =============================================================================

/// Default bind host for the API server.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default bind port for the API server.
pub const SERVER_PORT: u16 = 5000;

/// Default CORS allow-list (the development web client).
pub const ALLOWED_ORIGINS: &str = "http://localhost:3000";

/// Default request body limit (1 MiB). Notes are short text.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Default database URL.
pub const DATABASE_URL: &str = "postgres://localhost/pinnote";

// =============================================================================
// DATABASE POOL
// =============================================================================

/// Default maximum number of pooled connections.
pub const DB_MAX_CONNECTIONS: u32 = 10;

/// Default connection acquire timeout in seconds.
pub const DB_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default idle timeout in seconds.
pub const DB_IDLE_TIMEOUT_SECS: u64 = 600;

// =============================================================================
// CLIENT
// =============================================================================

/// Default base URL of the notes resource, as used by the web client.
pub const CLIENT_API_URL: &str = "http://localhost:5000/api/notes";

/// Default request timeout for the client in seconds.
pub const CLIENT_TIMEOUT_SECS: u64 = 30;

/// URL for accessing the PostgreSQL database (should contain a database name in the path)
pub const DB_URL: &str = "DATABASE_URL";
/// Maximum number of pooled connections the service keeps open to PostgreSQL
pub const DB_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";
/// When "true", every SQL statement the service runs is logged by sqlx
pub const DB_LOG_QUERIES: &str = "DB_LOG_QUERIES";
/// Socket address the HTTP server binds to, such as 127.0.0.1:8080
pub const LISTEN_ADDR: &str = "LISTEN_ADDR";
/// Log level configuration for the application. For formatting info, see [tracing_subscriber's EnvFilter documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";

/// URL for accessing the PostgreSQL server during integration tests (should not contain a database name in the path)
pub const TEST_DB_URL: &str = "TEST_DB_URL";

use crate::app_env;
use crate::config::OtelEndpoints;
use anyhow::Context;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{KeyValue, global};
use opentelemetry_http::HeaderExtractor;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{Resource, runtime};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing::{Span, debug, debug_span, field, warn};
use tracing_opentelemetry::{MetricsLayer, OpenTelemetryLayer, OpenTelemetrySpanExt};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, prelude::*, registry};

/// The name of the service as it should appear in OpenTelemetry collectors
const SERVICE_NAME: &str = "todolist-rest";
const SQLX_QUERY_DIRECTIVE: &str = "sqlx::query=debug";

/// Owns the OpenTelemetry providers that export data in the background. Keep it alive for the
/// lifetime of the server and call [OtelExporters::shutdown] on the way out so buffered spans
/// and metrics get flushed.
pub struct OtelExporters {
    tracer_provider: TracerProvider,
    meter_provider: SdkMeterProvider,
}

impl OtelExporters {
    /// Flushes and stops both exporters
    pub fn shutdown(self) {
        if let Err(err) = self.tracer_provider.shutdown() {
            warn!("span exporter did not shut down cleanly: {err}");
        }
        if let Err(err) = self.meter_provider.shutdown() {
            warn!("metric exporter did not shut down cleanly: {err}");
        }
    }
}

/// Attaches a tracing middleware layer to the given router. Each request gets its own span,
/// parented to any W3C trace context the caller sent along.
pub fn attach_tracing_http<T>(router: Router<T>) -> Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new().layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let req_span = debug_span!(
                        "request",
                        method = &request.method().as_str(),
                        path = request.uri().path(),
                        response_status = field::Empty,
                    );

                    req_span.set_parent(global::get_text_map_propagator(|propagator| {
                        propagator.extract(&HeaderExtractor(request.headers()))
                    }));

                    req_span
                })
                .on_response(
                    |response: &Response<Body>, latency: Duration, span: &Span| {
                        span.record("response_status", field::display(response.status()));
                        debug!(
                            latency_ms = latency.as_millis() as u64,
                            "request processing complete"
                        );
                    },
                ),
        ),
    )
}

/// Instantiates OpenTelemetry exporters which run in the background and send span and metric
/// data to an OTLP-compatible gRPC endpoint (typically http://localhost:4317 with a standard
/// sidecar setup)
pub fn init_exporters(endpoints: &OtelEndpoints) -> Result<OtelExporters, anyhow::Error> {
    let span_export = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoints.spans.as_str())
        .build()
        .context("building the span exporter")?;
    let meter_export = MetricExporter::builder()
        .with_tonic()
        .with_endpoint(endpoints.metrics.as_str())
        .build()
        .context("building the metric exporter")?;

    let metrics_reader = PeriodicReader::builder(meter_export, runtime::Tokio).build();

    let tracer_provider = TracerProvider::builder()
        .with_batch_exporter(span_export, runtime::Tokio)
        .with_resource(Resource::new([KeyValue::new("service.name", SERVICE_NAME)]))
        .build();
    let meter_provider = SdkMeterProvider::builder()
        .with_reader(metrics_reader)
        .with_resource(Resource::new([KeyValue::new("service.name", SERVICE_NAME)]))
        .build();

    Ok(OtelExporters {
        tracer_provider,
        meter_provider,
    })
}

/// Constructs a filter which uses [app_env::LOG_LEVEL] to configure per-module logging. Filters
/// to the "info" level by default. With [log_queries] set, sqlx statement logs are let through too.
pub fn init_env_filter(log_queries: bool) -> Result<EnvFilter, anyhow::Error> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(app_env::LOG_LEVEL)
        .from_env()
        .with_context(|| format!("{} contains an invalid filter", app_env::LOG_LEVEL))?;

    with_query_logging(env_filter, log_queries)
}

/// sqlx reports statements at "debug" under the "sqlx::query" target, so that target has to be
/// let through explicitly for the statements to show up at the default "info" level
fn with_query_logging(
    env_filter: EnvFilter,
    log_queries: bool,
) -> Result<EnvFilter, anyhow::Error> {
    if !log_queries {
        return Ok(env_filter);
    }

    let query_directive = SQLX_QUERY_DIRECTIVE
        .parse::<Directive>()
        .context("parsing the sqlx statement log directive")?;
    Ok(env_filter.add_directive(query_directive))
}

/// Sets up the global logging and tracing sinks. All spans and metrics at the "debug" level and above
/// are sent to OpenTelemetry if [otel_exporters] is provided. [env_filter] only applies to the JSON
/// logger printing to stdout, which also picks up sqlx's statement logs when those are enabled.
pub fn setup_logging_and_tracing(env_filter: EnvFilter, otel_exporters: Option<&OtelExporters>) {
    global::set_text_map_propagator(TraceContextPropagator::new());

    if let Some(exporters) = otel_exporters {
        registry()
            .with(LevelFilter::DEBUG)
            .with(OpenTelemetryLayer::new(
                exporters.tracer_provider.tracer(SERVICE_NAME),
            ))
            .with(MetricsLayer::new(exporters.meter_provider.clone()))
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_filter(env_filter),
            )
            .init();
    } else {
        registry()
            .with(LevelFilter::DEBUG)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_filter(env_filter),
            )
            .init();
    }
}

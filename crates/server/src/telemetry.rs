use axum::{body::Body, http::Request, response::Response};
use opentelemetry::{
    global,
    trace::{SpanKind, TraceContextExt, Tracer},
    Context, KeyValue,
};
use opentelemetry_otlp::{WithExportConfig, WithTonicConfig};
use std::{
    future::Future,
    pin::Pin,
    sync::OnceLock,
    task::{Context as TaskContext, Poll},
};
use tower::{Layer, Service};

use crate::auth::jwt::Claims;

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_SERVICE_NAME: &str = "printshop";

type InitError = Box<dyn std::error::Error + Send + Sync>;

/// Keeps the LoggerProvider alive for the process lifetime.
static LOGGER_PROVIDER: OnceLock<opentelemetry_sdk::logs::SdkLoggerProvider> = OnceLock::new();

/// Runtime for the OTLP gRPC exporters. Tonic's lazy channel spawns onto
/// the ambient Tokio runtime, which is not guaranteed to exist inside the
/// `dioxus::serve` setup closure.
static OTEL_RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();

/// Configure OTLP trace and log export.
///
/// Dioxus owns the `tracing` subscriber; this only installs the global
/// tracer provider used by [`OtelTraceLayer`] and bridges the `log` crate.
///
/// Environment:
///   - `OTEL_EXPORTER_OTLP_ENDPOINT`: collector gRPC address (export is off when unset)
///   - `OTEL_SERVICE_NAME`: service name tag, default `printshop`
///   - `DEPLOY_ENV`: deployment environment tag, default `development`
pub fn init_telemetry() {
    crate::config::load_dotenv();

    let Ok(endpoint) = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") else {
        tracing::info!("OTEL_EXPORTER_OTLP_ENDPOINT not set, skipping OTLP telemetry");
        return;
    };

    match install(&endpoint) {
        Ok(()) => tracing::info!(
            version = APP_VERSION,
            %endpoint,
            "Telemetry initialized, traces and logs exporting"
        ),
        Err(e) => tracing::error!(error = %e, %endpoint, "Telemetry disabled"),
    }
}

fn install(endpoint: &str) -> Result<(), InitError> {
    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());
    let environment = std::env::var("DEPLOY_ENV").unwrap_or_else(|_| "development".to_string());

    let rt = match OTEL_RUNTIME.get() {
        Some(rt) => rt,
        None => {
            let built = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .worker_threads(1)
                .build()?;
            let _ = OTEL_RUNTIME.set(built);
            OTEL_RUNTIME.get().ok_or("OTEL runtime not initialized")?
        }
    };
    let _guard = rt.enter();

    let tls = endpoint.starts_with("https://");

    let mut span_builder = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint);
    if tls {
        span_builder = span_builder.with_tls_config(
            opentelemetry_otlp::tonic_types::transport::ClientTlsConfig::new().with_native_roots(),
        );
    }
    let span_exporter = span_builder.build()?;

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name)
        .with_attribute(KeyValue::new("service.version", APP_VERSION))
        .with_attribute(KeyValue::new("deployment.environment", environment))
        .build();

    let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource.clone())
        .build();
    global::set_tracer_provider(tracer_provider);

    let mut log_builder = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint);
    if tls {
        log_builder = log_builder.with_tls_config(
            opentelemetry_otlp::tonic_types::transport::ClientTlsConfig::new().with_native_roots(),
        );
    }
    let log_exporter = log_builder.build()?;

    let logger_provider = opentelemetry_sdk::logs::SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();
    let _ = LOGGER_PROVIDER.set(logger_provider);
    let provider = LOGGER_PROVIDER
        .get()
        .ok_or("logger provider not initialized")?;

    // The `log` bridge is independent of the Dioxus tracing subscriber.
    let bridge = opentelemetry_appender_log::OpenTelemetryLogBridge::new(provider);
    match log::set_boxed_logger(Box::new(bridge)) {
        Ok(()) => log::set_max_level(log::LevelFilter::Info),
        Err(_) => tracing::warn!("Log bridge skipped, a `log` logger is already set"),
    }

    Ok(())
}

/// Collapse dynamic path segments so spans group by route.
///
/// `/api/admin/profiles/user_2abc/role` becomes `/api/admin/profiles/{id}/role`.
fn route_template(path: &str) -> String {
    const PROFILE_PREFIX: &str = "/api/admin/profiles/";
    match path.strip_prefix(PROFILE_PREFIX) {
        Some(rest) if !rest.is_empty() => match rest.split_once('/') {
            Some((_, tail)) => format!("{PROFILE_PREFIX}{{id}}/{tail}"),
            None => format!("{PROFILE_PREFIX}{{id}}"),
        },
        _ => path.to_string(),
    }
}

/// Tower layer that opens an OpenTelemetry server span per HTTP request,
/// tagged with method, route, request id, response status and the
/// authenticated identity when present.
#[derive(Clone)]
pub struct OtelTraceLayer;

impl<S> Layer<S> for OtelTraceLayer {
    type Service = OtelTraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OtelTraceService { inner }
    }
}

#[derive(Clone)]
pub struct OtelTraceService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for OtelTraceService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let tracer = global::tracer(DEFAULT_SERVICE_NAME);
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let route = route_template(&path);

        let request_id = req
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let mut attributes = vec![
            KeyValue::new("http.method", method.clone()),
            KeyValue::new("http.target", path),
            KeyValue::new("http.route", route.clone()),
            KeyValue::new("http.request_id", request_id),
        ];
        match req.extensions().get::<Claims>() {
            Some(claims) => {
                attributes.push(KeyValue::new("identity.id", claims.sub.clone()));
                attributes.push(KeyValue::new("auth.status", "authenticated"));
            }
            None => attributes.push(KeyValue::new("auth.status", "anonymous")),
        }

        let span = tracer
            .span_builder(format!("{method} {route}"))
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        let cx = Context::current_with_span(span);
        let mut inner = self.inner.clone();

        let guard = cx.clone().attach();
        let future = inner.call(req);
        drop(guard);

        Box::pin(async move {
            let response = future.await?;

            let span = cx.span();
            let status = response.status();
            span.set_attribute(KeyValue::new("http.status_code", status.as_u16() as i64));

            if status.is_server_error() {
                span.set_status(opentelemetry::trace::Status::error(status.to_string()));
            } else if status.is_client_error() {
                span.set_attribute(KeyValue::new("error.type", "client_error"));
            }

            Ok(response)
        })
    }
}

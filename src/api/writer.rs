//! Response writer: status, headers, optional schema header, body.

use axum::response::{IntoResponse, Response};
use http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS,
    CONTENT_LENGTH, CONTENT_TYPE,
};
use http::{HeaderName, HeaderValue, StatusCode};
use tracing::{debug, warn};

use super::envelope::{render_error, render_success};
use super::sink::{BufferedResponse, ResponseSink};
use crate::config::{AppConfig, CorsConfig, ServiceIdentity};
use crate::errors::{Error, ErrorReport, Result};
use crate::observability::ResponseMetrics;
use crate::response_span;
use crate::schema::schema_header_value;

/// Service version header
pub const VERSION_HEADER: HeaderName = HeaderName::from_static("cruise-control-version");

/// Commit id header
pub const COMMIT_ID_HEADER: HeaderName = HeaderName::from_static("cruise-control-commit_id");

/// Inferred schema of the response body
pub const JSON_SCHEMA_HEADER: HeaderName = HeaderName::from_static("cruise-control-json-schema");

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Caller's choice of body format and schema header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseFormat {
    /// Body is JSON (enveloped) rather than plain text
    pub json: bool,
    /// Caller asked for the inferred schema header
    pub wants_schema: bool,
}

impl ResponseFormat {
    pub fn json() -> Self {
        Self { json: true, wants_schema: false }
    }

    pub fn text() -> Self {
        Self { json: false, wants_schema: false }
    }

    pub fn with_schema(self) -> Self {
        Self { wants_schema: true, ..self }
    }

    /// The schema header is only produced for JSON bodies
    pub fn schema_requested(&self) -> bool {
        self.json && self.wants_schema
    }

    pub fn content_type(&self) -> HeaderValue {
        HeaderValue::from_static(if self.json { JSON_CONTENT_TYPE } else { TEXT_CONTENT_TYPE })
    }
}

/// Writes responses using one configuration snapshot.
///
/// The writer is stateless apart from the borrowed snapshot, so a single
/// instance can serve any number of concurrent requests; each call gets its
/// own sink.
#[derive(Debug, Clone, Copy)]
pub struct ResponseWriter<'a> {
    cors: &'a CorsConfig,
    identity: &'a ServiceIdentity,
    metrics: ResponseMetrics,
}

impl<'a> ResponseWriter<'a> {
    pub fn new(cors: &'a CorsConfig, identity: &'a ServiceIdentity) -> Self {
        Self { cors, identity, metrics: ResponseMetrics::new() }
    }

    pub fn from_config(config: &'a AppConfig) -> Self {
        Self::new(&config.cors, &config.identity)
    }

    /// Write a response whose body the caller already built.
    ///
    /// Every header value, including the schema, is computed before the sink
    /// is touched: a body marked as JSON that cannot be parsed for the schema
    /// header fails with [`Error::SchemaInference`] and leaves the sink
    /// untouched. Transport failures come back as [`Error::Io`].
    pub fn write<S>(&self, sink: &mut S, status: StatusCode, format: ResponseFormat, body: &str) -> Result<()>
    where
        S: ResponseSink + ?Sized,
    {
        let span = response_span!(status, format.json, format.schema_requested());
        let _enter = span.enter();

        let schema = if format.schema_requested() { Some(self.schema_header(body)?) } else { None };
        let cors = if self.cors.enabled {
            Some((
                config_header_value(&ACCESS_CONTROL_ALLOW_ORIGIN, &self.cors.allow_origin)?,
                config_header_value(&ACCESS_CONTROL_EXPOSE_HEADERS, &self.cors.expose_headers)?,
            ))
        } else {
            None
        };
        let version = config_header_value(&VERSION_HEADER, &self.identity.version)?;
        let commit_id = config_header_value(&COMMIT_ID_HEADER, &self.identity.commit_id)?;

        sink.set_status(status)?;
        sink.set_header(CONTENT_TYPE, format.content_type())?;
        if let Some((allow_origin, expose_headers)) = cors {
            sink.set_header(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin)?;
            sink.set_header(ACCESS_CONTROL_EXPOSE_HEADERS, expose_headers)?;
            sink.set_header(ACCESS_CONTROL_ALLOW_CREDENTIALS, HeaderValue::from_static("true"))?;
        }
        sink.set_header(VERSION_HEADER, version)?;
        sink.set_header(COMMIT_ID_HEADER, commit_id)?;
        if let Some(schema) = schema {
            sink.set_header(JSON_SCHEMA_HEADER, schema)?;
        }

        let bytes = body.as_bytes();
        sink.set_header(CONTENT_LENGTH, HeaderValue::from(bytes.len()))?;
        span.record("content_length", bytes.len());

        if let Err(e) = sink.write_body(bytes).and_then(|()| sink.flush()) {
            self.metrics.record_write_failure();
            warn!(error = %e, "Failed to write response body");
            return Err(Error::Io(e));
        }

        self.metrics.record_response(status.as_u16(), format.json, bytes.len());
        debug!("Response written");
        Ok(())
    }

    /// Wrap `message` in the success envelope (JSON) or send it raw (text)
    pub fn write_message<S>(&self, sink: &mut S, status: StatusCode, format: ResponseFormat, message: &str) -> Result<()>
    where
        S: ResponseSink + ?Sized,
    {
        let body = render_success(message, format.json)?;
        self.write(sink, status, format, &body)
    }

    /// Build the error body for a business failure and write it.
    ///
    /// The schema header is honoured on this path too; the error envelope is
    /// always valid JSON, so it cannot fail there.
    pub fn write_error<S>(
        &self,
        sink: &mut S,
        report: Option<&ErrorReport>,
        error_message: Option<&str>,
        status: StatusCode,
        format: ResponseFormat,
    ) -> Result<()>
    where
        S: ResponseSink + ?Sized,
    {
        debug!(
            status = %status,
            has_stack_trace = report.is_some(),
            error_message = error_message.unwrap_or_default(),
            "Writing error response"
        );
        let body = render_error(report, error_message, format.json)?;
        self.write(sink, status, format, &body)
    }

    /// [`write`](Self::write) into a fresh axum response
    pub fn respond(&self, status: StatusCode, format: ResponseFormat, body: &str) -> Result<Response> {
        let mut sink = BufferedResponse::new();
        self.write(&mut sink, status, format, body)?;
        Ok(sink.into_response())
    }

    /// [`write_message`](Self::write_message) into a fresh axum response
    pub fn respond_message(&self, status: StatusCode, format: ResponseFormat, message: &str) -> Result<Response> {
        let mut sink = BufferedResponse::new();
        self.write_message(&mut sink, status, format, message)?;
        Ok(sink.into_response())
    }

    /// [`write_error`](Self::write_error) into a fresh axum response
    pub fn respond_error(
        &self,
        report: Option<&ErrorReport>,
        error_message: Option<&str>,
        status: StatusCode,
        format: ResponseFormat,
    ) -> Result<Response> {
        let mut sink = BufferedResponse::new();
        self.write_error(&mut sink, report, error_message, status, format)?;
        Ok(sink.into_response())
    }

    fn schema_header(&self, body: &str) -> Result<HeaderValue> {
        let text = match schema_header_value(body) {
            Ok(text) => text,
            Err(e) => {
                self.metrics.record_schema_failure();
                warn!(error = %e, "Response body marked as JSON could not be parsed for the schema header");
                return Err(e);
            }
        };
        // Keys may carry non-ASCII text; header values accept it as opaque bytes
        HeaderValue::from_bytes(text.as_bytes())
            .map_err(|e| Error::invalid_header(JSON_SCHEMA_HEADER.as_str(), e.to_string()))
    }
}

fn config_header_value(name: &HeaderName, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| Error::invalid_header(name.as_str(), e.to_string()))
}

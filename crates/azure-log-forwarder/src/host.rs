// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Azure Functions custom handler.
//!
//! The Functions host owns the Event Hub trigger. For every delivered batch it
//! posts an invocation request to `/<function name>` on the handler port and
//! expects an invocation response with the log lines to attach.

use std::io;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper::{http, Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tracing::{debug, error, Level};

use crate::config::HostConfig;
use crate::context::{log, InvocationContext};
use crate::forwarder::LogForwarder;

pub const INVOCATION_ID_HEADER: &str = "x-azure-functions-invocationid";
/// Name of the Event Hub trigger binding in the invocation data.
pub const LOG_EVENTS_BINDING: &str = "logEvents";

/// Invocation request sent by the Functions host.
#[derive(Debug, Default, Deserialize)]
pub struct InvokeRequest {
    #[serde(rename = "Data", default)]
    pub data: Map<String, Value>,
    #[serde(rename = "Metadata", default)]
    pub metadata: Map<String, Value>,
}

/// Invocation response returned to the Functions host.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct InvokeResponse {
    #[serde(rename = "Outputs")]
    pub outputs: Map<String, Value>,
    #[serde(rename = "Logs")]
    pub logs: Vec<String>,
    #[serde(rename = "ReturnValue")]
    pub return_value: Value,
}

impl InvokeResponse {
    fn with_logs(logs: Vec<String>) -> Self {
        InvokeResponse {
            logs,
            ..Default::default()
        }
    }
}

/// Normalizes the trigger payload into a list of raw events.
///
/// The host hands over the batch as an array, but a single event or a JSON
/// encoded string shows up depending on the binding's data type.
#[must_use]
pub fn decode_events(payload: &Value) -> Vec<Value> {
    match payload {
        Value::Array(events) => events.iter().map(decode_string).collect(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::String(_)) | Err(_) => Vec::new(),
            Ok(decoded) => decode_events(&decoded),
        },
        Value::Object(_) => vec![payload.clone()],
        Value::Null | Value::Bool(_) | Value::Number(_) => Vec::new(),
    }
}

fn decode_string(event: &Value) -> Value {
    match event {
        Value::String(text) => serde_json::from_str(text).unwrap_or_else(|_| event.clone()),
        _ => event.clone(),
    }
}

pub struct ForwarderServer {
    forwarder: LogForwarder,
    config: HostConfig,
}

impl ForwarderServer {
    #[must_use]
    pub fn new(forwarder: LogForwarder, config: HostConfig) -> Self {
        ForwarderServer { forwarder, config }
    }

    /// Accepts connections until the listener fails.
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> io::Result<()> {
        let server = hyper::server::conn::http1::Builder::new();
        let mut joinset = tokio::task::JoinSet::new();

        let service = service_fn(move |req: Request<Incoming>| {
            let handler = Arc::clone(&self);
            async move { handler.handle(req).await }
        });

        loop {
            let conn = tokio::select! {
                con_res = listener.accept() => match con_res {
                    Err(e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::ConnectionAborted
                                | io::ErrorKind::ConnectionReset
                                | io::ErrorKind::ConnectionRefused
                        ) =>
                    {
                        continue;
                    }
                    Err(e) => {
                        error!("Server error: {e}");
                        return Err(e);
                    }
                    Ok((conn, _)) => conn,
                },
                finished = async {
                    match joinset.join_next().await {
                        Some(finished) => finished,
                        None => std::future::pending().await,
                    }
                } => match finished {
                    Err(e) if e.is_panic() => {
                        error!("Connection handler panicked: {e:?}");
                        continue;
                    },
                    Ok(()) | Err(_) => continue,
                },
            };
            let conn = hyper_util::rt::TokioIo::new(conn);
            let server = server.clone();
            let service = service.clone();
            joinset.spawn(async move {
                if let Err(e) = server.serve_connection(conn, service).await {
                    error!("Connection error: {e}");
                }
            });
        }
    }

    async fn handle(&self, req: Request<Incoming>) -> http::Result<Response<Full<Bytes>>> {
        let route = format!("/{}", self.config.function_name);
        if req.method() != Method::POST || req.uri().path() != route {
            debug!("No handler for {} {}", req.method(), req.uri().path());
            return Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Full::new(Bytes::new()));
        }

        let invocation_id = req
            .headers()
            .get(INVOCATION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| uuid::Uuid::new_v4().to_string(), str::to_string);

        let (status, response) = match req.into_body().collect().await {
            Ok(body) => self.invoke(invocation_id, &body.to_bytes()).await,
            Err(e) => {
                error!("Error reading invocation request: {e}");
                (StatusCode::BAD_REQUEST, InvokeResponse::default())
            }
        };

        let body = serde_json::to_vec(&response).unwrap_or_default();
        Response::builder()
            .status(status)
            .header(hyper::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
    }

    /// Runs one invocation from its raw request body.
    pub async fn invoke(&self, invocation_id: String, body: &[u8]) -> (StatusCode, InvokeResponse) {
        let context = InvocationContext::new(
            self.config.function_name.clone(),
            invocation_id,
            self.config.log_level,
        );

        let request: InvokeRequest = match serde_json::from_slice(body) {
            Ok(request) => request,
            Err(e) => {
                log(&context, Level::ERROR, || {
                    format!("Invalid invocation request: {e}")
                });
                return (
                    StatusCode::BAD_REQUEST,
                    InvokeResponse::with_logs(context.into_lines()),
                );
            }
        };

        let events = request
            .data
            .get(LOG_EVENTS_BINDING)
            .map(decode_events)
            .unwrap_or_default();

        let status = match self.forwarder.forward(&events, &context).await {
            Ok(_) => StatusCode::OK,
            Err(e) => {
                log(&context, Level::ERROR, || format!("{e}"));
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, InvokeResponse::with_logs(context.into_lines()))
    }
}

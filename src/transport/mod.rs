//! gRPC transport layer for sortrace.
//!
//! The canonical protocol surface is the JSON encoding of `SortRequest` and
//! `BatchResponse`. This transport carries those as bytes and runs every
//! batch through the [`SortRuntime`] on a blocking task.

use std::sync::Arc;

use serde::Serialize;
use tonic::{Request, Response, Status};

use crate::dispatch::SortRequest;
use crate::error::{ExecutionError, SortError};
use crate::runtime::SortRuntime;

pub mod proto {
    tonic::include_proto!("sortrace");
}

use proto::sort_service_server::{SortService, SortServiceServer};

// ----------------------------------------------------------------------------
// Limits (DoS protection)
// ----------------------------------------------------------------------------

/// Maximum size of a request JSON payload.
const MAX_REQUEST_JSON_BYTES: usize = 1024 * 1024; // 1 MiB

/// Maximum size of a response JSON payload. Quadratic traces are large.
const MAX_RESPONSE_JSON_BYTES: usize = 64 * 1024 * 1024; // 64 MiB

/// gRPC service implementation.
pub struct SortServiceImpl {
    runtime: Arc<SortRuntime>,
}

impl SortServiceImpl {
    #[must_use]
    pub fn new(runtime: Arc<SortRuntime>) -> Self {
        Self { runtime }
    }

    #[must_use]
    pub fn into_server(self) -> SortServiceServer<Self> {
        SortServiceServer::new(self)
            .max_decoding_message_size(MAX_REQUEST_JSON_BYTES + 1024)
            .max_encoding_message_size(MAX_RESPONSE_JSON_BYTES + 1024)
    }
}

fn invalid_argument(msg: impl Into<String>) -> Status {
    Status::invalid_argument(msg.into())
}

fn parse_request(bytes: &[u8]) -> Result<SortRequest, Status> {
    if bytes.is_empty() {
        return Err(invalid_argument("request_json is required"));
    }
    if bytes.len() > MAX_REQUEST_JSON_BYTES {
        return Err(invalid_argument("request_json exceeds maximum size"));
    }

    serde_json::from_slice(bytes).map_err(|e| invalid_argument(format!("invalid SortRequest JSON: {e}")))
}

fn encode_json<T: Serialize>(value: &T, max: usize) -> Result<Vec<u8>, Status> {
    let bytes = serde_json::to_vec(value)
        .map_err(|e| Status::internal(format!("failed to serialize response JSON: {e}")))?;
    if bytes.len() > max {
        return Err(Status::resource_exhausted("serialized JSON exceeds size limit"));
    }
    Ok(bytes)
}

fn status_from_sort_error(err: SortError) -> Status {
    match err {
        SortError::Validation(v) => Status::invalid_argument(v.to_string()),
        SortError::Transport(t) => Status::internal(t.to_string()),
        SortError::Internal { message } => Status::internal(message),
        SortError::Execution(e) => match e {
            ExecutionError::UnsupportedAlgorithm { .. } => Status::invalid_argument(e.to_string()),
            ExecutionError::QueueFull { .. } => Status::resource_exhausted(e.to_string()),
            ExecutionError::Timeout { .. } => Status::deadline_exceeded(e.to_string()),
            ExecutionError::Disconnected { .. } => Status::internal(e.to_string()),
        },
    }
}

#[tonic::async_trait]
impl SortService for SortServiceImpl {
    async fn sort(
        &self,
        request: Request<proto::SortRequestMessage>,
    ) -> Result<Response<proto::SortResponseMessage>, Status> {
        let req = parse_request(&request.into_inner().request_json)?;
        let request_id = req.request_id;

        let runtime = Arc::clone(&self.runtime);
        let response = tokio::task::spawn_blocking(move || runtime.dispatch(&req))
            .await
            .map_err(|e| Status::internal(format!("sort task failed: {e}")))?
            .map_err(|err| {
                tracing::warn!(%request_id, %err, "sort request rejected");
                status_from_sort_error(err)
            })?;

        let response_json = encode_json(&response, MAX_RESPONSE_JSON_BYTES)?;
        Ok(Response::new(proto::SortResponseMessage { response_json }))
    }

    async fn list_algorithms(
        &self,
        _request: Request<proto::ListAlgorithmsRequest>,
    ) -> Result<Response<proto::ListAlgorithmsResponse>, Status> {
        let catalog = self.runtime.dispatcher().registry().catalog();
        let catalog_json = encode_json(&catalog, MAX_RESPONSE_JSON_BYTES)?;
        Ok(Response::new(proto::ListAlgorithmsResponse { catalog_json }))
    }
}

pub use proto::sort_service_client::SortServiceClient;

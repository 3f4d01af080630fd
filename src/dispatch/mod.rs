//! Batch dispatch: one array, several named algorithms.
//!
//! The dispatcher is the boundary between callers (a web handler, the gRPC
//! transport, tests) and the sort engines. It validates the whole request
//! once, then runs each requested identifier on its own copy of the array.
//! An unknown identifier becomes a per-key failure entry; it never aborts
//! the rest of the batch.

mod request;
mod response;
mod serialization;
mod validation;

use std::collections::BTreeMap;

use crate::algorithms::Algorithm;
use crate::error::{ExecutionError, SortResult};
use crate::registry::AlgorithmRegistry;

pub use request::{decode_array, SortRequest};
pub use response::{AlgorithmResult, BatchResponse, FailureKind, TIME_NOT_AVAILABLE};
pub use serialization::{request_from_json, response_from_json, to_json, to_json_pretty};
pub use validation::{
    DispatchConfig, DEFAULT_MAX_ALGORITHMS, DEFAULT_MAX_ELEMENTS, DEFAULT_MAX_TRACE_STEPS, MAX_IDENTIFIER_LEN,
};

/// A resolved batch entry: the requested identifier and what it maps to.
pub type PlannedSort = (String, Result<Algorithm, ExecutionError>);

/// Synchronous batch dispatcher.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    registry: AlgorithmRegistry,
    config: DispatchConfig,
}

impl Dispatcher {
    /// Creates a dispatcher over `registry` with the given limits.
    #[must_use]
    pub fn new(registry: AlgorithmRegistry, config: DispatchConfig) -> Self {
        Self { registry, config }
    }

    /// The algorithms this dispatcher will run.
    #[must_use]
    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    /// The limits applied to each request.
    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Validates `request` and resolves each distinct identifier, in
    /// request order.
    ///
    /// Fails if the resolved algorithms could record more steps than the
    /// configured budget allows.
    pub fn plan(&self, request: &SortRequest) -> SortResult<Vec<PlannedSort>> {
        request.validate(&self.config)?;

        let mut planned: Vec<PlannedSort> = Vec::with_capacity(request.algorithms.len());
        for id in &request.algorithms {
            if planned.iter().any(|(seen, _)| seen == id) {
                continue;
            }
            let resolved = self.registry.resolve(id);
            if let Err(err) = &resolved {
                tracing::warn!(request_id = %request.request_id, algorithm = %id, %err, "skipping algorithm");
            }
            planned.push((id.clone(), resolved));
        }

        let resolved = planned.iter().filter_map(|(_, r)| r.as_ref().ok().copied());
        self.config.check_trace_budget(request.array.len(), resolved)?;
        Ok(planned)
    }

    /// Runs every requested algorithm and collects the results.
    ///
    /// Fails only when the request as a whole is invalid.
    pub fn dispatch(&self, request: &SortRequest) -> SortResult<BatchResponse> {
        let mut results = BTreeMap::new();
        for (id, resolved) in self.plan(request)? {
            let result = match resolved {
                Ok(algorithm) => AlgorithmResult::completed(algorithm.sort(&request.array)?),
                Err(err) => AlgorithmResult::unsupported(&err),
            };
            results.insert(id, result);
        }

        tracing::debug!(
            request_id = %request.request_id,
            algorithms = results.len(),
            len = request.array.len(),
            "batch dispatched"
        );
        Ok(BatchResponse::new(request.request_id, results))
    }
}

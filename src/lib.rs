//! # sortrace - step-recording sorting engine
//!
//! sortrace instruments classical in-memory sorting algorithms so that every
//! primitive operation they perform is recorded as a replayable trace. A
//! consumer, such as an animation front-end, plays the trace back step by
//! step to show how the algorithm transforms the array.
//!
//! ## Core Concepts
//!
//! - **Step**: one primitive event (compare, swap, place, divide, partition, pivot, merge, merge-complete)
//! - **Trace**: the ordered steps of exactly one sort invocation
//! - **Algorithm**: one of bubble, selection, insertion, quick and merge sort
//! - **Dispatcher**: runs several named algorithms over private copies of one array
//!
//! ## Usage
//!
//! ```rust
//! use sortrace::{Algorithm, Number, Step};
//!
//! let input = vec![Number::Int(5), Number::Int(3), Number::Int(8), Number::Int(1)];
//! let outcome = Algorithm::Merge.sort(&input)?;
//!
//! assert_eq!(outcome.trace.steps()[0], Step::Divide(0, 3, 1));
//! assert_eq!(outcome.trace.replay(&input)?, outcome.sorted);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core: step vocabulary, traces and the engines
pub mod algorithms;
pub mod error;
pub mod step;
pub mod trace;
pub mod value;

// Dispatch boundary
pub mod dispatch;
pub mod registry;
pub mod runtime;

#[cfg(feature = "transport-grpc")]
pub mod transport;

// Re-export primary types at crate root for convenience
pub use algorithms::{Algorithm, SortOutcome};
pub use error::{ExecutionError, SortError, SortResult, TransportError, ValidationError};
pub use step::{Step, StepKind};
pub use trace::{Trace, TraceStats};
pub use value::Number;

pub use dispatch::{AlgorithmResult, BatchResponse, DispatchConfig, Dispatcher, SortRequest};
pub use registry::{AlgorithmInfo, AlgorithmRegistry};
pub use runtime::{DefaultRouter, ExecutionLane, LaneRouter, RuntimeConfig, SortHandle, SortRuntime};

//! # strata-workers
//!
//! Best-effort offload of heavy jobs to external workers. A missing worker,
//! a timeout, and a transport error all end the same way: the dispatcher
//! reports `fallback_local` and the caller runs the job in-process.

pub mod dispatcher;
pub mod registry;
pub mod transport;

pub use dispatcher::WorkerDispatcher;
pub use registry::WorkerRegistry;
pub use transport::{transport_from_config, NoWorkers};

#[cfg(feature = "http")]
pub use transport::http::HttpWorkerTransport;

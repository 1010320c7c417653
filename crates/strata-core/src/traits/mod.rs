mod embedding;
mod storage;
mod trace_sink;
mod worker_transport;

pub use embedding::IEmbeddingProvider;
pub use storage::{
    IActivationStorage, ICapsuleStorage, IConflictStorage, IEdgeStorage, IJobStorage,
    IMemoryStore,
};
pub use trace_sink::ITraceSink;
pub use worker_transport::IWorkerTransport;

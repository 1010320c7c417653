//! Individual score factors. Each returns a value in [0, 1] except
//! project affinity, which may exceed 1.

pub mod access;
pub mod affinity;
pub mod penalties;
pub mod semantic;
pub mod temporal;

use chrono::{DateTime, Utc};

/// Query-side inputs shared by every candidate.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub query_vector: Vec<f32>,
    pub project_key: Option<String>,
    pub session_key: Option<String>,
    pub now: DateTime<Utc>,
}

impl QueryContext {
    pub fn new(query_vector: Vec<f32>) -> Self {
        Self {
            query_vector,
            project_key: None,
            session_key: None,
            now: Utc::now(),
        }
    }

    pub fn with_keys(mut self, project_key: Option<String>, session_key: Option<String>) -> Self {
        self.project_key = project_key;
        self.session_key = session_key;
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

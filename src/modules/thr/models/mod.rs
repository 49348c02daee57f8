mod thr;

pub use thr::{ThrBatchResult, ThrCategory, ThrFailure, ThrResult, ThrSummary};

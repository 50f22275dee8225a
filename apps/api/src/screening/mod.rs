// Resume Screening Engine
// Implements: normalization, skill taxonomy + extraction, TF-IDF similarity,
// skill matching, score aggregation, feedback, persistence.
// The scoring pipeline is pure; only handlers and storage touch I/O.

pub mod aggregator;
pub mod extractor;
pub mod feedback;
pub mod handlers;
pub mod matcher;
pub mod normalizer;
pub mod scorer;
pub mod similarity;
pub mod storage;
pub mod taxonomy;

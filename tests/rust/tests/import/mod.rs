//! Import pipeline tests
//!
//! Registry fetching against a mock HTTP server, source dispatch,
//! per-item execution and the end-to-end application service.

mod page_fetcher;

//! # Boltwire Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # criterion benchmarks (codec and decoders)
//! └── src/integration/
//!     ├── bolt_flows.rs # bytes → registry → decoder, per protocol version
//!     └── raft_rounds.rs# simulated Raft rounds checked for safety
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bw-tests
//! cargo test -p bw-tests integration::raft_rounds
//!
//! # Benchmarks
//! cargo bench -p bw-tests
//! ```

pub mod integration;

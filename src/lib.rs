//! Blocktris (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so the binary and the
//! integration tests can use `blocktris::{core, input, runtime, term, types}`.

pub use blocktris_core as core;
pub use blocktris_input as input;
pub use blocktris_runtime as runtime;
pub use blocktris_term as term;
pub use blocktris_types as types;

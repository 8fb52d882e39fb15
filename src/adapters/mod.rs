// Adapters layer: concrete implementations of the domain ports for external
// systems (subprocesses, HTTP). The recording mock lives here too so that
// integration tests can script tool behavior without a real toolchain.

pub mod mock;
pub mod probe;
pub mod process;

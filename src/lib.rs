//! Lists the CPU feature flags of the host by name.
//!
//! Feature flags are grouped in three independent categories ([`cpu::FeatureCategory`]),
//! each a 64-bit mask with its own table of canonical names. Where every named bit
//! lives in the CPUID output is described by an embedded JSON document, so the
//! detection code itself knows nothing about individual features.
//!
//! ```no_run
//! use cpuflags::cpu::{FeatureReporter, HostFeatures};
//!
//! // Prints something like `fpu vme de pse tsc ... syscall nx lm ... lahf_lm abm `
//! FeatureReporter::new(HostFeatures::host()).run()?;
//! # Ok::<(), cpuflags::FeatureError>(())
//! ```

pub mod cpu;
mod cpuid;
mod error;
mod schema;

pub use error::FeatureError;

//! tiltmode-core: orientation-to-mode resolution.
//! Pure library: types, configuration, the debounce/priority resolver and the
//! sink contract. No IO, no async, no logging; callers log the returned
//! dispositions.

pub mod config;
pub mod error;
pub mod resolver;
pub mod sink;
pub mod types;

pub use config::ResolverConfig;
pub use error::{Capability, CapabilityUnavailable, ConfigurationError};
pub use resolver::{Disposition, ModeResolver, Observation, PendingCandidate, ResolverPhase};
pub use sink::{ModeSink, ResolverDriver};
pub use types::{Candidate, CandidateRecord, Mode, ModeChange, SourceKind};

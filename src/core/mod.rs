//! Endpoint usage engine.
//!
//! Pipeline for one run:
//!
//! 1. `loader`: spec file → ordered [`EndpointDeclaration`]s
//! 2. `pattern`: declarations → [`PatternSet`] (malformed and duplicate declarations flagged)
//! 3. `extract`: project trees → ordered [`Candidate`]s
//! 4. `aggregate`: candidates matched by `matcher` → immutable [`UsageReport`]
//!
//! [`RunContext`] wires these together from configuration.

pub mod aggregate;
pub mod context;
pub mod endpoint;
pub mod extract;
pub mod loader;
pub mod matcher;
pub mod pattern;

pub use aggregate::{
    Candidate, DuplicateDeclaration, EndpointUsage, Location, UsageAggregator, UsageRecord,
    UsageReport, UsageStatus, aggregate,
};
pub use context::{RunContext, RunReport};
pub use endpoint::{EndpointDeclaration, EndpointKey, HttpMethod, Segment};
pub use extract::{Project, ScanFailure};
pub use loader::{LoadError, load_endpoints};
pub use matcher::{MatchOptions, Matcher, match_candidate};
pub use pattern::{
    CompiledPattern, DeclarationStatus, MalformedTemplateError, PatternSet, TemplateErrorKind,
    compile,
};

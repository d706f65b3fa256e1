//! # Stagewire
//!
//! Construction-time wiring of deployment pipeline stages and their
//! published outputs.
//!
//! Stagewire models the three-tier output-propagation pattern used by
//! continuous-delivery pipelines:
//!
//! - **Stack**: the innermost deployable unit, declaring resources and
//!   publishing named, deferred output handles
//! - **Stage**: owns exactly one stack and re-exports a chosen subset of
//!   its outputs without leaking the stack's concrete shape
//! - **Pipeline**: wires a source, a synth step, one deployed stage and
//!   the post-deployment validation steps that consume the stage's
//!   outputs as environment variables
//!
//! Everything is checked while the graph is being built: a binding to an
//! output the stage does not expose fails construction, not deployment.
//!
//! ## Quick Start
//!
//! ```rust
//! use stagewire::prelude::*;
//!
//! # fn main() -> Result<(), StagewireError> {
//! let root = Scope::root();
//!
//! let mut stage = Stage::build(&root, "Prod", |scope| {
//!     let mut stack = Stack::new(scope, "App")?;
//!     stack.add_output("EndpointURL")?;
//!     Ok(stack)
//! })?;
//! stage.expose("EndpointURL")?;
//!
//! let pipeline = PipelineBuilder::new(&root, "Workshop")
//!     .source(CodeSource::new("workshop-repo", "main"))
//!     .synth_commands(["npm ci", "npm run build", "npx synth"])
//!     .deploy(stage)?
//!     .validation(
//!         ValidationStep::new("TestEndpoint")
//!             .bind("ENDPOINT_URL", "EndpointURL")
//!             .command("curl -Ssf $ENDPOINT_URL"),
//!     )
//!     .build()?;
//!
//! let template = pipeline.synth();
//! assert_eq!(template.post_steps.len(), 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod errors;
pub mod observability;
pub mod outputs;
pub mod pipeline;
pub mod resolve;
pub mod runner;
pub mod scope;
pub mod stack;
pub mod stage;
pub mod synth;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::{
        CommandFailedError, InvalidIdError, NameCollisionError, PipelineValidationError,
        StagewireError, UnknownOutputError, UnresolvedTokenError,
    };
    pub use crate::observability::init_tracing;
    pub use crate::outputs::{OutputHandle, OutputProvider, OutputToken};
    pub use crate::pipeline::{
        BoundStep, CodeSource, Pipeline, PipelineBuilder, ValidationStep,
    };
    pub use crate::resolve::{OutputValues, ResolvedStep};
    pub use crate::runner::{RecordingRunner, ShellRunner, StepReport, StepRunner};
    pub use crate::scope::Scope;
    pub use crate::stack::{Resource, Stack};
    pub use crate::stage::Stage;
    pub use crate::synth::{PipelineTemplate, StageTemplate, StepTemplate};
}

//! Compute resolution and convergence for the Composable Information Machine
//!
//! Two concerns, one crate:
//!
//! - **Resolution**: pick a concrete (image, hardware, location) triple out
//!   of a provider catalog that satisfies declarative [`SelectionCriteria`]
//! - **Convergence**: block until a node, image or TCP endpoint reaches an
//!   intended state, failing fast on a state the caller declared fatal
//!
//! The crate performs no I/O of its own. Catalog listing and status refresh
//! are supplied by the caller through [`resolver::ComputeCatalog`] and
//! [`polling::RefreshStrategy`]. Logging goes through `tracing`; with no
//! subscriber installed it costs nothing.

pub mod config;
pub mod domain;
pub mod errors;
pub mod polling;
pub mod resolver;
pub mod selection;

// Re-export commonly used types
pub use config::ComputeTimeouts;
pub use errors::{ComputeError, ComputeResult};
pub use polling::{retry, BoundedRetryPoller, RetryPolicy, StateConvergencePoller};
pub use resolver::{ComputeCatalog, StaticCatalog, TemplateResolver};
pub use selection::{SelectionCriteria, TemplateSpec};

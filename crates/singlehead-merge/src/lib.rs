//! Singlehead Merge
//!
//! Merges the headers listed by an umbrella include file, and their
//! implementation files, into one single-header library.
//!
//! ## Modules
//!
//! - `scanner` - Walks the umbrella file and inlines project headers
//! - `filter` - Per-line header filter with the exclusion toggle
//! - `emitter` - Guarded implementation block
//! - `amalgamator` - Runs the pipeline and finalizes the output atomically

pub mod amalgamator;
pub mod directive;
pub mod emitter;
pub mod filter;
pub mod lines;
pub mod progress;
pub mod resolver;
pub mod scanner;
pub mod version;

pub use amalgamator::{Amalgamator, AmalgamationReport, HeaderListing};
pub use filter::{ContentFilter, FilterState};
pub use progress::{ProgressEvent, ProgressPhase};
pub use scanner::{IncludeReference, IncludeRegistry};
pub use version::{Clock, FixedClock, SystemClock};

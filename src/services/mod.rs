//! Services module - the cleanup pipeline.
//!
//! Leaf first:
//!
//! - [`probe`]: asks the download client whether transfers are active ([`DelugeProbe`])
//! - [`gate`]: turns the probe answer and `--force` into go / no-go ([`CleanupGate`])
//! - [`resolver`]: picks each library root from explicit paths or the config ([`PathResolver`])
//! - [`cleaning`]: the [`MediaCleaner`] contract and the shared plan/apply engine
//! - [`movie`] / [`tv`]: the two cleaners, built on [`release_parser`]
//! - [`dispatcher`]: runs all of the above in order ([`CleanupDispatcher`])
//!
//! The pipeline is sequential. The probe is the only async step (a bounded
//! subprocess call); cleaners run synchronously, movie before tv-series.
//!
//! # Usage Example
//!
//! ```ignore
//! use mediacleaner::services::{CleanupDispatcher, DelugeProbe, MovieCleaner, TvCleaner};
//!
//! let dispatcher = CleanupDispatcher::new(
//!     Box::new(DelugeProbe::default()),
//!     Box::new(MovieCleaner::new()),
//!     Box::new(TvCleaner::new()),
//! );
//! let reports = dispatcher.run(&options).await?;
//! ```

pub mod cleaning;
pub mod dispatcher;
pub mod gate;
pub mod movie;
pub mod probe;
pub mod release_parser;
pub mod resolver;
pub mod tv;

pub use cleaning::{CleanAction, CleanSummary, CleaningError, MediaCleaner};
pub use dispatcher::CleanupDispatcher;
pub use gate::CleanupGate;
pub use movie::MovieCleaner;
pub use probe::{ActivityProbe, DelugeProbe};
pub use resolver::{PathResolver, ResolveError};
pub use tv::TvCleaner;

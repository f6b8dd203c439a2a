// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod projector;
pub mod summary;

pub use projector::{
    project, CompletionProjector, ProjectionError, ProjectionFeed, ProjectionState,
    ProjectorHandle,
};
pub use summary::{summarize_details, DetailSummary};

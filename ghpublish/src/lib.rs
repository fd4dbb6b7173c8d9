//! # ghpublish
//!
//! Publishes the artifacts of a CI build as a GitHub release.
//!
//! ## Overview
//!
//! At the end of a pipeline `ghpublish` takes the built commit, the fetched
//! artifact tree and the release notes, and:
//!
//! 1. resolves the single `MAJOR.MINOR.PATCH.BUILD` version carried by the
//!    artifact filenames,
//! 2. creates an annotated tag for that version on the built commit (moving
//!    an existing tag reference if needed),
//! 3. creates a release named `MAJOR.MINOR.PATCH` for the tag,
//! 4. uploads every artifact file as a release asset.
//!
//! Every step runs in order and the first failure stops the run.
//!
//! ## Usage
//!
//! ```bash
//! # Inside the pipeline: token, notes and stage come from the environment
//! GITHUB_RELEASE_TOKEN=... PPL_Name=Build ghpublish
//!
//! # Explicit repository and commit
//! ghpublish --repository owner/repo --revision 0123abc --stage Build
//! ```
//!
//! ## Configuration
//!
//! Configuration can be specified in `.config/ghpublish.toml` in your project
//! directory or `~/.config/ghpublish.toml` for user-wide settings.

/// Enumeration of the artifact tree
pub mod artifacts;

/// Release asset upload
pub mod asset;

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Configuration file handling and default settings management
pub mod config;

/// REST endpoint URL construction
pub mod endpoints;

/// Repository and revision discovery from pipeline variables
pub mod environment;

/// Error types and error handling utilities
pub mod error;

/// Local repository fallbacks
pub mod git;

/// GitHub client context and repository types
pub mod github;

/// Orchestration of the publish workflow
pub mod publisher;

/// Release creation
pub mod release;

/// Annotated tag creation and reference update
pub mod tag;

/// HTTP transport seam
pub mod transport;

/// Version extraction from artifact filenames
pub mod version;

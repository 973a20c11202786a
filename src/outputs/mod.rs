//! Output generation for the rendered digest.
//!
//! # Submodules
//!
//! - [`html`]: Renders summarized articles into the HTML digest document and
//!   optionally writes a dated snapshot of it to disk
//!
//! Rendering is a pure function over its inputs; the snapshot writer is the
//! only file system touchpoint and is skipped unless a snapshot directory
//! is configured.

pub mod html;

#![doc = "content-stream: core logic for a content-and-product browsing app backed by a headless CMS."]

//! This crate contains the data model, collaborator contracts and pipelines
//! for the browsing app: filtered content fetching, live content
//! reconciliation (dedup, filter matching, ordering) and enquiry
//! validation/submission. Presentation is left to embedding frontends; the
//! bundled CLI is a thin consumer of the same pipelines.

pub mod cli;
pub mod config;
pub mod contract;
pub mod enquiry;
pub mod feed;
pub mod gateway;
pub mod model;
pub mod page;
pub mod reconcile;

//! Domain logic for the Ezemailer template validator.
//!
//! Everything in this crate is free of I/O: the HTML transform engine, the
//! persisted template content format, upload ingestion, entitlement rules,
//! the preview/download contract, and the payment provider interface.

pub mod entitlement;
pub mod error;
pub mod ingest;
pub mod payment;
pub mod preview;
pub mod template;
pub mod transform;
pub mod types;

//! External transport: documents, client and the bounded request gate.

pub(crate) mod client;
pub(crate) mod gate;
pub(crate) mod mutations;
pub(crate) mod queries;

pub(crate) use client::{GraphClient, Transport};

//! All kinds of errors in this crate.

use displaydoc::Display;
use thiserror::Error;

/// All kinds of errors in this crate.
///
/// Every error is fatal for the current invocation: the generator is a
/// deterministic, offline step, so retrying with the same input cannot
/// succeed.
#[derive(Debug, Display, Error)]
pub enum Error {
    /// Invalid rule string: {0:?} is not of the form bXsY, where X is a subset of {{3, ..., 8}} and Y is a subset of {{0, ..., 8}}.
    MalformedRule(String),
    /// Invalid target: {0:?} is not a supported symmetry or backend.
    InvalidTarget(String),
    /// No Boolean circuit is known for rule integer {0}.
    UnknownCircuit(u16),
    /// Insufficiently many physical registers for gate step {step}.
    RegisterExhaustion {
        /// Index of the gate step that could not be assigned a slot.
        step: usize,
    },
    /// Unable to read the circuit catalog: {0}.
    CatalogIo(#[from] std::io::Error),
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Error::MalformedRule(a), Error::MalformedRule(b)) => a == b,
            (Error::InvalidTarget(a), Error::InvalidTarget(b)) => a == b,
            (Error::UnknownCircuit(a), Error::UnknownCircuit(b)) => a == b,
            (Error::RegisterExhaustion { step: a }, Error::RegisterExhaustion { step: b }) => {
                a == b
            }
            (Error::CatalogIo(a), Error::CatalogIo(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}

//! Status/data/error envelope used by the federation API.
//!
//! Every upstream response — single or batch element — arrives wrapped in
//! `{status, data?, error?}`. Batch responses are order-aligned with the
//! requested ids, so a per-element envelope is what lets one failed entity
//! ride alongside successful siblings.

use serde::{Deserialize, Serialize};

use crate::CaissaError;

/// Outcome flag of an upstream response element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Ok,
    Error,
}

/// One upstream response element: status plus optional payload or error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct FetchEnvelope<T> {
    pub status: FetchStatus,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> FetchEnvelope<T> {
    /// Successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            status: FetchStatus::Ok,
            data: Some(data),
            error: None,
        }
    }

    /// Failed envelope carrying an upstream error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: FetchStatus::Error,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Collapse to the payload: `Some` only when the status is ok and a
    /// payload is present. A malformed ok-without-data envelope counts as
    /// a failure.
    pub fn into_data(self) -> Option<T> {
        match self.status {
            FetchStatus::Ok => self.data,
            FetchStatus::Error => None,
        }
    }

    /// Collapse to a `Result`, turning an error envelope (or a missing
    /// payload) into [`CaissaError::Upstream`].
    pub fn into_result(self) -> crate::Result<T> {
        let Self { status, data, error } = self;
        let data = match status {
            FetchStatus::Ok => data,
            FetchStatus::Error => None,
        };
        data.ok_or_else(|| {
            CaissaError::Upstream(error.unwrap_or_else(|| "missing payload".into()))
        })
    }

    /// Upstream error message, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

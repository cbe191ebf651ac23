// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON codec for the two persisted documents
//!
//! ```text
//! reservebot-resources     {"resources": {"db1/prod": Resource, ...}}
//! reservebot-reservations  {"reservations": [Reservation, ...]}
//! ```

use rb_core::{Reservation, Resource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Resources keyed by derived key, iterated in key order
pub type ResourceMap = BTreeMap<String, Resource>;

/// The two top-level documents held by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Document {
    Resources,
    Reservations,
}

impl Document {
    /// Storage key of the document
    pub fn key(self) -> &'static str {
        match self {
            Document::Resources => "reservebot-resources",
            Document::Reservations => "reservebot-reservations",
        }
    }

    /// Encoded empty collection, written when a document is first read
    pub fn empty(self) -> Result<String, CodecError> {
        match self {
            Document::Resources => encode_resources(&ResourceMap::new()),
            Document::Reservations => encode_reservations(&[]),
        }
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode {document}: {source}")]
    Encode {
        document: Document,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to decode {document}: {source}")]
    Decode {
        document: Document,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize)]
struct ResourcesOut<'a> {
    resources: &'a ResourceMap,
}

#[derive(Deserialize)]
struct ResourcesIn {
    #[serde(default)]
    resources: Option<ResourceMap>,
}

#[derive(Serialize)]
struct ReservationsOut<'a> {
    reservations: &'a [Reservation],
}

#[derive(Deserialize)]
struct ReservationsIn {
    #[serde(default)]
    reservations: Option<Vec<Reservation>>,
}

pub fn encode_resources(resources: &ResourceMap) -> Result<String, CodecError> {
    serde_json::to_string(&ResourcesOut { resources }).map_err(|source| CodecError::Encode {
        document: Document::Resources,
        source,
    })
}

/// Decode the resource document; a missing or null mapping decodes as empty
pub fn decode_resources(raw: &str) -> Result<ResourceMap, CodecError> {
    let doc: ResourcesIn = serde_json::from_str(raw).map_err(|source| CodecError::Decode {
        document: Document::Resources,
        source,
    })?;
    Ok(doc.resources.unwrap_or_default())
}

pub fn encode_reservations(reservations: &[Reservation]) -> Result<String, CodecError> {
    serde_json::to_string(&ReservationsOut { reservations }).map_err(|source| {
        CodecError::Encode {
            document: Document::Reservations,
            source,
        }
    })
}

/// Decode the reservation document; a missing or null sequence decodes as empty
pub fn decode_reservations(raw: &str) -> Result<Vec<Reservation>, CodecError> {
    let doc: ReservationsIn = serde_json::from_str(raw).map_err(|source| CodecError::Decode {
        document: Document::Reservations,
        source,
    })?;
    Ok(doc.reservations.unwrap_or_default())
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;

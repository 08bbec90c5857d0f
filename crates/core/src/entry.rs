// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Production records as captured on the shop floor.
//!
//! Field names on the wire follow the production endpoint's schema
//! (`production_date`, `machineId`, `quantityProduced`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Work shift during which a record was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    Morning,
    Afternoon,
    Night,
}

impl Shift {
    /// Returns the string representation used on the wire and in display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Morning => "Morning",
            Shift::Afternoon => "Afternoon",
            Shift::Night => "Night",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Shift {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "morning" => Ok(Shift::Morning),
            "afternoon" => Ok(Shift::Afternoon),
            "night" => Ok(Shift::Night),
            _ => Err(Error::InvalidShift(s.to_string())),
        }
    }
}

/// One production record, the payload carried by the offline queue.
///
/// The quantity is signed on purpose: the endpoint owns validation and a
/// negative quantity must reach it to be rejected there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionEntry {
    pub production_date: NaiveDate,
    #[serde(rename = "machineId")]
    pub machine_id: String,
    pub shift: Shift,
    #[serde(rename = "productName")]
    pub product_name: String,
    #[serde(rename = "quantityProduced")]
    pub quantity_produced: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(rename = "operatorId", default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,
    #[serde(rename = "timeTakenMinutes", default, skip_serializing_if = "Option::is_none")]
    pub time_taken_minutes: Option<u32>,
}

impl ProductionEntry {
    /// Creates an entry with the required fields and no optional ones.
    pub fn new(
        production_date: NaiveDate,
        machine_id: impl Into<String>,
        shift: Shift,
        product_name: impl Into<String>,
        quantity_produced: i64,
    ) -> Self {
        ProductionEntry {
            production_date,
            machine_id: machine_id.into(),
            shift,
            product_name: product_name.into(),
            quantity_produced,
            remarks: None,
            operator_id: None,
            time_taken_minutes: None,
        }
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    pub fn with_operator(mut self, operator_id: impl Into<String>) -> Self {
        self.operator_id = Some(operator_id.into());
        self
    }

    pub fn with_time_taken(mut self, minutes: u32) -> Self {
        self.time_taken_minutes = Some(minutes);
        self
    }
}

/// Parses a production date in `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

/// A record as stored by the remote endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteRecord {
    /// Server-assigned identifier, when the response carries one.
    pub id: Option<String>,
    /// The response body as returned by the server.
    pub body: serde_json::Value,
}

impl RemoteRecord {
    /// Wraps a response body, extracting the server id from `_id` or `id`.
    ///
    /// Accepts both plain string ids and extended-JSON `{"$oid": "..."}`.
    pub fn from_body(body: serde_json::Value) -> Self {
        let id = ["_id", "id"].iter().find_map(|key| match body.get(*key) {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Object(obj)) => {
                obj.get("$oid").and_then(|v| v.as_str()).map(str::to_string)
            }
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        });
        RemoteRecord { id, body }
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;

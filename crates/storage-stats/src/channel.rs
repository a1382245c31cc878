//! Method-channel bridge.
//!
//! A host dispatches named calls (`getLocalStorageStatistic`,
//! `getAppUsedSpace`) and receives either a flat map of byte counts, a
//! structured error, or a not-implemented signal for unknown names.
//!
//! ## Wire format
//!
//! Calls and responses are JSON objects; [`StorageChannel::serve`] reads one
//! call per line and writes one response per line:
//!
//! ```text
//! -> {"method":"getLocalStorageStatistic"}
//! <- {"status":"success","result":{"free":250000000,"total":1000000000}}
//! -> {"method":"getBatteryLevel"}
//! <- {"status":"notImplemented"}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::StorageService;
use crate::error::Error;
use crate::types::ResultMap;

/// Name the bridge registers the channel under
pub const CHANNEL_NAME: &str = "storage_space";

/// Code for lines that are not a valid method call
pub const BAD_REQUEST: &str = "BAD_REQUEST";

/// Message attached to every failed storage query
pub const FAILURE_MESSAGE: &str = "Failed to calculate storage space";

/// The operations this channel answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Free/total space of the canonical volume
    GetLocalStorageStatistic,
    /// App/user-data/cache breakdown
    GetAppUsedSpace,
}

impl Method {
    /// Every recognized method
    pub const ALL: [Method; 2] = [Method::GetLocalStorageStatistic, Method::GetAppUsedSpace];

    /// Wire name of the method
    pub fn name(&self) -> &'static str {
        match self {
            Method::GetLocalStorageStatistic => "getLocalStorageStatistic",
            Method::GetAppUsedSpace => "getAppUsedSpace",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| Error::UnsupportedOperation(s.to_string()))
    }
}

/// A named call arriving over the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Operation name
    pub method: String,
    /// Call arguments (unused by both queries)
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub arguments: serde_json::Value,
}

impl MethodCall {
    /// A call without arguments
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: serde_json::Value::Null,
        }
    }
}

/// What the channel sends back for one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResponse {
    /// Query succeeded
    Success {
        /// Named byte counts
        result: ResultMap,
    },
    /// Query failed
    Error {
        /// Stable machine-readable code
        code: String,
        /// Short human message
        message: String,
        /// Underlying error text
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    /// No such method on this channel
    NotImplemented,
}

impl MethodResponse {
    /// Convert a query error into its bridge form.
    ///
    /// Unsupported operations become `NotImplemented`, never an error.
    pub fn from_error(err: &Error) -> Self {
        if err.is_unsupported() {
            return MethodResponse::NotImplemented;
        }
        MethodResponse::Error {
            code: err.code().to_string(),
            message: FAILURE_MESSAGE.to_string(),
            details: Some(err.to_string()),
        }
    }

    /// Returns true for error responses
    pub fn is_error(&self) -> bool {
        matches!(self, MethodResponse::Error { .. })
    }
}

/// Dispatches method calls to a [`StorageService`].
pub struct StorageChannel {
    service: StorageService,
}

impl StorageChannel {
    /// Wrap a service
    pub fn new(service: StorageService) -> Self {
        Self { service }
    }

    /// The wrapped service
    pub fn service(&self) -> &StorageService {
        &self.service
    }

    /// Answer one call. Blocks for the duration of the query.
    pub fn handle(&self, call: &MethodCall) -> MethodResponse {
        let method = match call.method.parse::<Method>() {
            Ok(m) => m,
            Err(_) => {
                log::debug!("{}: not implemented", call.method);
                return MethodResponse::NotImplemented;
            }
        };

        let result = match method {
            Method::GetLocalStorageStatistic => self
                .service
                .get_local_storage_statistic()
                .map(|s| s.to_map()),
            Method::GetAppUsedSpace => self.service.get_app_used_space().map(|u| u.to_map()),
        };

        match result {
            Ok(result) => MethodResponse::Success { result },
            Err(e) => {
                log::error!("Error calculating storage space: {e}");
                MethodResponse::from_error(&e)
            }
        }
    }

    /// Answer line-delimited JSON calls from `reader` until EOF.
    ///
    /// Blank lines are skipped. Malformed lines get a `BAD_REQUEST` error
    /// response and the loop continues. Returns the number of responses
    /// written.
    pub fn serve<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> io::Result<usize> {
        let mut answered = 0;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            // Raw bytes: a line that is not UTF-8 is a bad request, not an I/O error
            let line = buf.trim_ascii();
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_slice::<MethodCall>(line) {
                Ok(call) => self.handle(&call),
                Err(e) => {
                    log::warn!("Malformed method call: {e}");
                    MethodResponse::Error {
                        code: BAD_REQUEST.to_string(),
                        message: "Malformed method call".to_string(),
                        details: Some(e.to_string()),
                    }
                }
            };

            serde_json::to_writer(&mut writer, &response)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            answered += 1;
        }

        Ok(answered)
    }
}

//! Error-surface policy
//!
//! Decides what a failed operation does to the script: hand the error back,
//! kill the process, or panic. The decision table is a pure function so it can
//! be checked without a server; [`ErrorPolicy::enforce`] carries it out.

use serde::Deserialize;
use std::fmt;

use crate::{BridgeError, Result};

/// Operations exposed to scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    NewClient,
    Insert,
    InsertMany,
    Find,
    FindOne,
    UpdateOne,
    FindAll,
    DeleteOne,
    DeleteMany,
    DropCollection,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::NewClient => "NewClient",
            Operation::Insert => "Insert",
            Operation::InsertMany => "InsertMany",
            Operation::Find => "Find",
            Operation::FindOne => "FindOne",
            Operation::UpdateOne => "UpdateOne",
            Operation::FindAll => "FindAll",
            Operation::DeleteOne => "DeleteOne",
            Operation::DeleteMany => "DeleteMany",
            Operation::DropCollection => "DropCollection",
        }
    }

    /// Operations whose errors the legacy surface hands back to the script
    fn returns_errors(self) -> bool {
        matches!(
            self,
            Operation::NewClient | Operation::Insert | Operation::InsertMany
        )
    }

    fn drains_cursor(self) -> bool {
        matches!(self, Operation::Find | Operation::FindAll)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How driver errors reach the script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Factory and inserts return the error as a value; reads, updates,
    /// deletes and drops are fatal; cursor drain failures panic.
    #[default]
    Legacy,
    /// Every driver error is raised to the script.
    Raise,
}

/// What to do with a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Hand the error to the script
    Return,
    /// Log the error and terminate the process
    Fatal,
    /// Panic with the error
    Panic,
}

impl ErrorPolicy {
    pub fn disposition(self, op: Operation, err: &BridgeError) -> Disposition {
        match self {
            ErrorPolicy::Raise => Disposition::Return,
            ErrorPolicy::Legacy if op.returns_errors() => Disposition::Return,
            ErrorPolicy::Legacy if op.drains_cursor() && err.is_cursor_drain() => {
                Disposition::Panic
            }
            ErrorPolicy::Legacy => Disposition::Fatal,
        }
    }

    /// Returned errors are script values rather than exceptions
    pub fn errors_as_values(self) -> bool {
        self == ErrorPolicy::Legacy
    }

    /// Apply the policy to an operation result.
    ///
    /// Only errors with a [`Disposition::Return`] come back as `Err`; the
    /// others never return.
    pub fn enforce<T>(self, op: Operation, result: Result<T>) -> Result<T> {
        let err = match result {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        match self.disposition(op, &err) {
            Disposition::Return => Err(err),
            Disposition::Fatal => {
                tracing::error!("{}: {}", op, err);
                std::process::exit(1)
            }
            Disposition::Panic => panic!("{}: {}", op, err),
        }
    }
}

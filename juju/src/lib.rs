//! # Juju controller client
//!
//! The small part of the Juju API the inventory collector needs, spoken directly over the
//! controller's websocket endpoint:
//!
//! - **`Controller`**: TLS connection to `wss://<endpoint>/api`, login, model listing
//! - **`Model`**: a per-model connection to `wss://<endpoint>/model/<uuid>/api` for
//!   `FullStatus` and `ExportBundle`
//!
//! Facade versions are negotiated from the list the controller returns at login. Calls carry no
//! timeout of their own.

#[macro_use]
extern crate tracing;

mod controller;
mod error;
mod model;
mod rpc;
mod tls;

pub use controller::{
    ConnectOptions,
    Controller,
    ModelSummary,
};
pub use error::{
    JujuError,
    NOTHING_TO_EXPORT,
};
pub use model::Model;

// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A pure [Rust](https://www.rust-lang.org)
//! [Modbus](https://en.wikipedia.org/wiki/Modbus) RTU master engine.
//!
//! Modbus is based on a [master/slave](https://en.wikipedia.org/wiki/Master/slave_(technology))
//! model. Following the usual terminology of this library family the master
//! is called *client* here.
//!
//! The engine is synchronous and blocking: every request is framed, sent
//! through an injected byte [`Transport`](transport::Transport) and the call
//! returns only once the response has been validated or the transaction
//! has failed.
//! Nothing is allocated on the transaction path; all buffers are fixed-size
//! and owned by the [`Client`](client::rtu::Client).
//!
//! ## Installation
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! modbus-rtu-master = "*"
//! ```
//!
//! ## Results
//!
//! All operations return a [`Result`] with two layers: the outer [`Error`]
//! covers local and framing failures (timeouts, CRC mismatches, invalid
//! arguments), the inner [`ExceptionCode`] carries an exception reported by
//! the addressed device.

pub mod prelude;

pub mod client;
pub mod transport;

mod buffer;
pub use self::buffer::WordBuffer;

mod codec;
pub use self::codec::rtu::{crc16, crc16_update};

mod context;
pub use self::context::{Config, TransactionContext, BUFFER_CAPACITY};

mod error;
pub use self::error::{Error, ProtocolError};

mod frame;
pub use self::frame::{
    Address, Coil, ExceptionCode, FunctionCode, Quantity, Request, Word, MAX_READ_WRITE_REGISTERS,
    MAX_WRITE_COILS, MAX_WRITE_REGISTERS,
};

mod slave;
pub use self::slave::{Slave, SlaveId};

/// Specialized [`std::result::Result`] type for _Modbus_ client API.
///
/// This [`Result`] type contains 2 layers of errors.
///
/// 1. [`Error`]: An unexpected protocol error or a local failure.
/// 2. [`ExceptionCode`]: An error occurred on the _Modbus_ server.
pub type Result<T> = std::result::Result<std::result::Result<T, ExceptionCode>, Error>;

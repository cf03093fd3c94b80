// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types.

use thiserror::Error;

use crate::{FunctionCode, Quantity, Slave};

/// Local or framing failure of a _Modbus_ transaction.
///
/// Exceptions reported by the addressed device are not errors in this
/// sense, see [`crate::Result`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The response violated the protocol.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// No complete response arrived within the configured timeout.
    #[error("response timed out after {timeout} ms")]
    Timeout { timeout: u16 },

    /// A required transport callback has not been provided.
    #[error("illegal configuration: missing `{0}` callback")]
    IllegalConfiguration(&'static str),

    /// A buffer index is not below the fixed buffer capacity.
    #[error("illegal data address: index {index} exceeds buffer capacity {capacity}")]
    IllegalDataAddress { index: usize, capacity: usize },

    /// A write quantity is outside of the range the protocol allows.
    #[error("illegal data value: quantity {quantity} for function {function} not in 1..={max}")]
    IllegalDataValue {
        function: FunctionCode,
        quantity: Quantity,
        max: Quantity,
    },
}

/// _Modbus_ protocol error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The response was sent by another device than the one addressed.
    #[error("invalid slave id: expected {expected}, received {received}")]
    InvalidSlaveId { expected: Slave, received: Slave },

    /// The function code of the response does not match the request.
    #[error("invalid function: expected {expected}, received 0x{received:0>2X}")]
    InvalidFunction { expected: FunctionCode, received: u8 },

    /// The trailing checksum of the response is wrong.
    #[error("invalid CRC: expected 0x{expected:0>4X}, received 0x{received:0>4X}")]
    InvalidCrc { expected: u16, received: u16 },
}

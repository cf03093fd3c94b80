// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types and traits

///////////////////////////////////////////////////////////////////
/// Modules
///////////////////////////////////////////////////////////////////
pub use crate::client;

#[allow(missing_docs)]
pub mod rtu {
    pub use crate::client::rtu::*;
}

///////////////////////////////////////////////////////////////////
/// Types
///////////////////////////////////////////////////////////////////
pub use crate::{Config, Error, ExceptionCode, ProtocolError, TransactionContext};
pub use crate::{Slave, SlaveId};

#[cfg(feature = "callbacks")]
pub use crate::transport::{CallbackTransport, CallbackTransportBuilder};

///////////////////////////////////////////////////////////////////
/// Traits
///////////////////////////////////////////////////////////////////
pub use crate::client::{Reader, Writer};
pub use crate::transport::{ByteSink, ByteSource, Clock, Hooks, Transport};

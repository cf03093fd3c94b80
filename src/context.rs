// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    buffer::WordBuffer,
    codec::packed_coils_words,
    frame::*,
    Error, Slave,
};

/// Capacity of the response and transmit buffers in words.
pub const BUFFER_CAPACITY: usize = 64;

/// Client configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Time in milliseconds to wait for a complete response after the
    /// request has been sent.
    pub response_timeout: u16,
}

impl Config {
    /// Default response timeout in milliseconds.
    pub const DEFAULT_RESPONSE_TIMEOUT: u16 = 2000;

    #[must_use]
    pub const fn with_response_timeout(mut self, response_timeout: u16) -> Self {
        self.response_timeout = response_timeout;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            response_timeout: Self::DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}

/// Per-call parameters and buffers of a transaction.
///
/// Owned by a client and reused for every call. The response buffer
/// only holds meaningful data after a transaction succeeded and is
/// replaced as a whole by the next successful one.
#[derive(Debug, Clone)]
pub struct TransactionContext {
    pub(crate) slave: Slave,
    pub(crate) read_address: Address,
    pub(crate) read_quantity: Quantity,
    pub(crate) write_address: Address,
    pub(crate) write_quantity: Quantity,
    pub(crate) response_timeout: u16,
    pub(crate) response: WordBuffer<BUFFER_CAPACITY>,
    pub(crate) transmit: WordBuffer<BUFFER_CAPACITY>,
}

impl TransactionContext {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            slave: Slave(0),
            read_address: 0,
            read_quantity: 0,
            write_address: 0,
            write_quantity: 0,
            response_timeout: config.response_timeout,
            response: WordBuffer::new(),
            transmit: WordBuffer::new(),
        }
    }

    /// Device addressed by the most recent call.
    #[must_use]
    pub const fn slave(&self) -> Slave {
        self.slave
    }

    #[must_use]
    pub const fn read_address(&self) -> Address {
        self.read_address
    }

    #[must_use]
    pub const fn read_quantity(&self) -> Quantity {
        self.read_quantity
    }

    #[must_use]
    pub const fn write_address(&self) -> Address {
        self.write_address
    }

    #[must_use]
    pub const fn write_quantity(&self) -> Quantity {
        self.write_quantity
    }

    #[must_use]
    pub const fn response_timeout(&self) -> u16 {
        self.response_timeout
    }

    pub fn set_response_timeout(&mut self, response_timeout: u16) {
        self.response_timeout = response_timeout;
    }

    #[must_use]
    pub const fn response(&self) -> &WordBuffer<BUFFER_CAPACITY> {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut WordBuffer<BUFFER_CAPACITY> {
        &mut self.response
    }

    #[must_use]
    pub const fn transmit(&self) -> &WordBuffer<BUFFER_CAPACITY> {
        &self.transmit
    }

    pub fn transmit_mut(&mut self) -> &mut WordBuffer<BUFFER_CAPACITY> {
        &mut self.transmit
    }

    /// Builds the request for `function` from the current parameters.
    ///
    /// Write quantities are checked against the protocol limits and the
    /// transmit buffer capacity before anything is encoded.
    pub(crate) fn request(&self, function: FunctionCode) -> Result<Request<'_>, Error> {
        use crate::frame::FunctionCode::*;
        let request = match function {
            ReadCoils => Request::ReadCoils(self.read_address, self.read_quantity),
            ReadDiscreteInputs => {
                Request::ReadDiscreteInputs(self.read_address, self.read_quantity)
            }
            ReadHoldingRegisters => {
                Request::ReadHoldingRegisters(self.read_address, self.read_quantity)
            }
            ReadInputRegisters => {
                Request::ReadInputRegisters(self.read_address, self.read_quantity)
            }
            WriteSingleCoil => Request::WriteSingleCoil(self.write_address, self.write_quantity),
            WriteSingleRegister => {
                Request::WriteSingleRegister(self.write_address, self.transmit.get(0)?)
            }
            WriteMultipleCoils => {
                let quantity =
                    check_write_quantity(function, self.write_quantity, MAX_WRITE_COILS)?;
                let packed = self.transmit.prefix(packed_coils_words(quantity))?;
                Request::WriteMultipleCoils(self.write_address, quantity, packed)
            }
            WriteMultipleRegisters => {
                let quantity =
                    check_write_quantity(function, self.write_quantity, MAX_WRITE_REGISTERS)?;
                let words = self.transmit.prefix(quantity.into())?;
                Request::WriteMultipleRegisters(self.write_address, words)
            }
            MaskWriteRegister => Request::MaskWriteRegister(
                self.write_address,
                self.transmit.get(0)?,
                self.transmit.get(1)?,
            ),
            ReadWriteMultipleRegisters => {
                let quantity =
                    check_write_quantity(function, self.write_quantity, MAX_READ_WRITE_REGISTERS)?;
                let words = self.transmit.prefix(quantity.into())?;
                Request::ReadWriteMultipleRegisters(
                    self.read_address,
                    self.read_quantity,
                    self.write_address,
                    words,
                )
            }
        };
        Ok(request)
    }
}

impl Default for TransactionContext {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn check_write_quantity(
    function: FunctionCode,
    quantity: Quantity,
    max: Quantity,
) -> Result<Quantity, Error> {
    if quantity == 0 || quantity > max {
        return Err(Error::IllegalDataValue {
            function,
            quantity,
            max,
        });
    }
    Ok(quantity)
}

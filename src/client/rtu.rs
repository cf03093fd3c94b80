// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blocking _Modbus_ RTU client

use super::{Reader, Writer};

use crate::{
    codec::{self, bool_to_coil},
    context::{Config, TransactionContext},
    frame::{rtu::*, *},
    transport::Transport,
    Error, ProtocolError, Result, Slave,
};

/// Bytes awaited before the response header has been inspected.
const INITIAL_REMAINING: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Exception(ExceptionCode),
    Protocol(ProtocolError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Collecting { remaining: usize },
    HeaderReady { remaining: usize },
    Complete,
    Failed(Failure),
    TimedOut,
}

/// Accumulates the response to a single request.
#[derive(Debug)]
struct Receiver {
    request_context: RequestContext,
    adu: Adu,
    state: State,
}

impl Receiver {
    const fn new(request_context: RequestContext) -> Self {
        Self {
            request_context,
            adu: Adu::new(),
            state: State::Collecting {
                remaining: INITIAL_REMAINING,
            },
        }
    }

    const fn is_collecting(&self) -> bool {
        matches!(
            self.state,
            State::Collecting { .. } | State::HeaderReady { .. }
        )
    }

    fn push(&mut self, byte: u8) {
        if !self.is_collecting() {
            return;
        }
        self.adu.push(byte);
        self.state = match self.state {
            State::Collecting { .. } if self.adu.len() == HEADER_LEN => {
                match self.inspect_header() {
                    Ok(0) => State::Complete,
                    Ok(remaining) => State::HeaderReady { remaining },
                    Err(failure) => State::Failed(failure),
                }
            }
            State::Collecting { remaining } => State::Collecting {
                remaining: remaining.saturating_sub(1),
            },
            State::HeaderReady { remaining } if remaining <= 1 => State::Complete,
            State::HeaderReady { remaining } => State::HeaderReady {
                remaining: remaining - 1,
            },
            state => state,
        };
    }

    /// Validates the first bytes of the response and determines how
    /// many bytes are still missing.
    fn inspect_header(&self) -> std::result::Result<usize, Failure> {
        let RequestContext {
            function_code,
            header: req_hdr,
        } = self.request_context;
        let bytes = self.adu.as_bytes();
        let rsp_hdr = Header {
            slave: Slave(bytes[0]),
        };
        verify_response_header(&req_hdr, &rsp_hdr).map_err(Failure::Protocol)?;

        let function = bytes[1];
        if function & 0x7F != function_code.value() {
            return Err(Failure::Protocol(ProtocolError::InvalidFunction {
                expected: function_code,
                received: function,
            }));
        }
        if function & 0x80 != 0 {
            return Err(Failure::Exception(ExceptionCode::new(bytes[2])));
        }
        Ok(codec::rtu::remaining_response_len(function_code, bytes[2]))
    }

    /// A response that is still incomplete or has just been completed
    /// when `elapsed` exceeds `timeout` is discarded.
    fn check_timeout(&mut self, elapsed: u32, timeout: u16) {
        if elapsed > u32::from(timeout) && !matches!(self.state, State::Failed(_)) {
            self.state = State::TimedOut;
        }
    }

    fn finish(self, timeout: u16) -> Result<Adu> {
        let Self { adu, state, .. } = self;
        match state {
            State::Complete => {
                log::trace!("Received response ADU: {:?}", adu);
                codec::rtu::verify_crc(adu.as_bytes())?;
                Ok(Ok(adu))
            }
            State::Failed(Failure::Exception(exception)) => Ok(Err(exception)),
            State::Failed(Failure::Protocol(err)) => Err(err.into()),
            State::Collecting { .. } | State::HeaderReady { .. } | State::TimedOut => {
                Err(Error::Timeout { timeout })
            }
        }
    }
}

/// _Modbus_ RTU client.
///
/// Owns the transport and the [`TransactionContext`]. Every operation
/// blocks until the response has been received and validated or the
/// response timeout has elapsed. Failed operations leave the response
/// buffer untouched.
#[derive(Debug)]
pub struct Client<T> {
    transport: T,
    context: TransactionContext,
}

impl<T> Client<T> {
    pub const fn new(transport: T, config: Config) -> Self {
        Self {
            transport,
            context: TransactionContext::new(config),
        }
    }

    #[must_use]
    pub const fn context(&self) -> &TransactionContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut TransactionContext {
        &mut self.context
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Reads a word of the response buffer.
    ///
    /// The index is checked against the buffer capacity, not against the
    /// number of words received.
    pub fn response_buffer(&self, index: usize) -> std::result::Result<Word, Error> {
        self.context.response.get(index)
    }

    /// The words decoded from the last successful response.
    #[must_use]
    pub fn response_words(&self) -> &[Word] {
        self.context.response.as_slice()
    }

    pub fn clear_response_buffer(&mut self) {
        self.context.response.clear();
    }

    pub fn set_transmit_buffer(
        &mut self,
        index: usize,
        word: Word,
    ) -> std::result::Result<(), Error> {
        self.context.transmit.set(index, word)
    }

    /// Loads `words` into the transmit buffer starting at index 0.
    pub fn set_transmit_words(&mut self, words: &[Word]) -> std::result::Result<(), Error> {
        self.context.transmit.set_words(words)
    }

    pub fn clear_transmit_buffer(&mut self) {
        self.context.transmit.clear();
    }
}

impl<T> Client<T>
where
    T: Transport,
{
    fn call(&mut self, function: FunctionCode) -> Result<()> {
        let slave = self.context.slave;
        let result = self
            .send_request(function)
            .and_then(|request_context| self.recv_response(request_context));
        match &result {
            Ok(Ok(())) => log::debug!("Call {} on slave {} succeeded", function, slave),
            Ok(Err(exception)) => log::debug!(
                "Call {} on slave {} answered with exception: {}",
                function,
                slave,
                exception
            ),
            Err(err) => log::debug!("Call {} on slave {} failed: {}", function, slave, err),
        }
        result
    }

    fn send_request(
        &mut self,
        function: FunctionCode,
    ) -> std::result::Result<RequestContext, Error> {
        let header = Header {
            slave: self.context.slave,
        };
        let mut adu = Adu::new();
        let request = self.context.request(function)?;
        log::debug!("Call {:?} on slave {}", request, header.slave);
        codec::rtu::encode_request_adu(&mut adu, header, &request);
        log::trace!("Sending request ADU: {:?}", adu);

        self.transport.pre_transmission();
        for byte in adu.as_bytes() {
            self.transport.write_byte(*byte);
        }
        self.transport.flush();
        self.transport.post_transmission();

        Ok(RequestContext {
            function_code: function,
            header,
        })
    }

    fn recv_response(&mut self, request_context: RequestContext) -> Result<()> {
        let timeout = self.context.response_timeout;
        let start = self.transport.millis();
        let mut receiver = Receiver::new(request_context);
        while receiver.is_collecting() {
            if self.transport.byte_available() {
                receiver.push(self.transport.read_byte());
            } else {
                self.transport.idle();
            }
            let elapsed = self.transport.millis().wrapping_sub(start);
            receiver.check_timeout(elapsed, timeout);
        }

        let adu = match receiver.finish(timeout)? {
            Ok(adu) => adu,
            Err(exception) => return Ok(Err(exception)),
        };
        let bytes = adu.as_bytes();
        // Strip address and CRC.
        let pdu = bytes
            .get(1..bytes.len().saturating_sub(2))
            .unwrap_or_default();
        codec::decode_response_pdu(
            request_context.function_code,
            pdu,
            &mut self.context.response,
        );
        Ok(Ok(()))
    }

    fn read(
        &mut self,
        function: FunctionCode,
        slave: Slave,
        addr: Address,
        cnt: Quantity,
    ) -> Result<&[Word]> {
        self.context.slave = slave;
        self.context.read_address = addr;
        self.context.read_quantity = cnt;
        self.call_for_response(function)
    }

    fn write(
        &mut self,
        function: FunctionCode,
        slave: Slave,
        addr: Address,
        quantity: Quantity,
    ) -> Result<()> {
        self.context.slave = slave;
        self.context.write_address = addr;
        self.context.write_quantity = quantity;
        self.call(function)
    }

    fn call_for_response(&mut self, function: FunctionCode) -> Result<&[Word]> {
        match self.call(function)? {
            Ok(()) => Ok(Ok(self.context.response.as_slice())),
            Err(exception) => Ok(Err(exception)),
        }
    }
}

impl<T> Reader for Client<T>
where
    T: Transport,
{
    fn read_coils(&mut self, slave: Slave, addr: Address, cnt: Quantity) -> Result<&[Word]> {
        self.read(FunctionCode::ReadCoils, slave, addr, cnt)
    }

    fn read_discrete_inputs(
        &mut self,
        slave: Slave,
        addr: Address,
        cnt: Quantity,
    ) -> Result<&[Word]> {
        self.read(FunctionCode::ReadDiscreteInputs, slave, addr, cnt)
    }

    fn read_holding_registers(
        &mut self,
        slave: Slave,
        addr: Address,
        cnt: Quantity,
    ) -> Result<&[Word]> {
        self.read(FunctionCode::ReadHoldingRegisters, slave, addr, cnt)
    }

    fn read_input_registers(
        &mut self,
        slave: Slave,
        addr: Address,
        cnt: Quantity,
    ) -> Result<&[Word]> {
        self.read(FunctionCode::ReadInputRegisters, slave, addr, cnt)
    }

    fn read_write_multiple_registers(
        &mut self,
        slave: Slave,
        read_addr: Address,
        read_count: Quantity,
        write_addr: Address,
        write_count: Quantity,
    ) -> Result<&[Word]> {
        self.context.write_address = write_addr;
        self.context.write_quantity = write_count;
        self.read(
            FunctionCode::ReadWriteMultipleRegisters,
            slave,
            read_addr,
            read_count,
        )
    }
}

impl<T> Writer for Client<T>
where
    T: Transport,
{
    fn write_single_coil(&mut self, slave: Slave, addr: Address, coil: Coil) -> Result<()> {
        self.write(FunctionCode::WriteSingleCoil, slave, addr, bool_to_coil(coil))
    }

    fn write_single_register(&mut self, slave: Slave, addr: Address, word: Word) -> Result<()> {
        self.context.transmit.set(0, word)?;
        self.write(FunctionCode::WriteSingleRegister, slave, addr, 0)
    }

    fn write_multiple_coils(&mut self, slave: Slave, addr: Address, cnt: Quantity) -> Result<()> {
        self.write(FunctionCode::WriteMultipleCoils, slave, addr, cnt)
    }

    fn write_multiple_registers(
        &mut self,
        slave: Slave,
        addr: Address,
        cnt: Quantity,
    ) -> Result<()> {
        self.write(FunctionCode::WriteMultipleRegisters, slave, addr, cnt)
    }

    fn masked_write_register(
        &mut self,
        slave: Slave,
        addr: Address,
        and_mask: Word,
        or_mask: Word,
    ) -> Result<()> {
        self.context.transmit.set(0, and_mask)?;
        self.context.transmit.set(1, or_mask)?;
        self.write(FunctionCode::MaskWriteRegister, slave, addr, 0)
    }
}

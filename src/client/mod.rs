// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modbus clients

use crate::{frame::*, slave::*, Result};

pub mod rtu;

/// Blocking _Modbus_ reader
///
/// Successful reads return the decoded words, which remain available in
/// the response buffer until the next successful call.
pub trait Reader {
    /// Read multiple coils (0x01)
    ///
    /// Coil bytes are packed into words, the first byte in the lower half.
    fn read_coils(&mut self, slave: Slave, addr: Address, cnt: Quantity) -> Result<&[Word]>;

    /// Read multiple discrete inputs (0x02)
    ///
    /// Input bytes are packed into words, the first byte in the lower half.
    fn read_discrete_inputs(
        &mut self,
        slave: Slave,
        addr: Address,
        cnt: Quantity,
    ) -> Result<&[Word]>;

    /// Read multiple holding registers (0x03)
    fn read_holding_registers(
        &mut self,
        slave: Slave,
        addr: Address,
        cnt: Quantity,
    ) -> Result<&[Word]>;

    /// Read multiple input registers (0x04)
    fn read_input_registers(
        &mut self,
        slave: Slave,
        addr: Address,
        cnt: Quantity,
    ) -> Result<&[Word]>;

    /// Read and write multiple holding registers (0x17)
    ///
    /// The first `write_count` words of the transmit buffer are written.
    /// The write operation is performed before the read unlike
    /// the name of the operation might suggest!
    fn read_write_multiple_registers(
        &mut self,
        slave: Slave,
        read_addr: Address,
        read_count: Quantity,
        write_addr: Address,
        write_count: Quantity,
    ) -> Result<&[Word]>;
}

/// Blocking _Modbus_ writer
pub trait Writer {
    /// Write a single coil (0x05)
    fn write_single_coil(&mut self, slave: Slave, addr: Address, coil: Coil) -> Result<()>;

    /// Write a single holding register (0x06)
    ///
    /// The word is placed at index 0 of the transmit buffer.
    fn write_single_register(&mut self, slave: Slave, addr: Address, word: Word) -> Result<()>;

    /// Write multiple coils (0x0F)
    ///
    /// The coil bits must have been packed into the transmit buffer
    /// beforehand, two bytes per word with the lower half first.
    fn write_multiple_coils(&mut self, slave: Slave, addr: Address, cnt: Quantity)
        -> Result<()>;

    /// Write multiple holding registers (0x10)
    ///
    /// The first `cnt` words of the transmit buffer are written.
    fn write_multiple_registers(
        &mut self,
        slave: Slave,
        addr: Address,
        cnt: Quantity,
    ) -> Result<()>;

    /// Set or clear individual bits of a holding register (0x16)
    ///
    /// The masks are placed at index 0 and 1 of the transmit buffer.
    fn masked_write_register(
        &mut self,
        slave: Slave,
        addr: Address,
        and_mask: Word,
        or_mask: Word,
    ) -> Result<()>;
}

// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use byteorder::{ByteOrder as _, LittleEndian};
use bytes::BufMut as _;

use super::encode_request_pdu;
use crate::{
    frame::{rtu::*, FunctionCode, Request},
    ProtocolError,
};

const CRC_LEN: usize = 2;

/// Folds a single byte into a running Modbus CRC16.
///
/// Start with `0xFFFF`. Polynomial `0xA001` (reflected `0x8005`).
#[must_use]
pub const fn crc16_update(crc: u16, byte: u8) -> u16 {
    let mut crc = crc ^ byte as u16;
    let mut bit = 0;
    while bit < 8 {
        if (crc & 0x0001) != 0 {
            crc = (crc >> 1) ^ 0xA001;
        } else {
            crc >>= 1;
        }
        bit += 1;
    }
    crc
}

/// Modbus CRC16 of `buf`.
///
/// Transmitted low byte first.
#[must_use]
pub fn crc16(buf: &[u8]) -> u16 {
    buf.iter().fold(0xFFFF, |crc, byte| crc16_update(crc, *byte))
}

/// Assembles address, PDU and CRC of `request` into `adu`.
pub(crate) fn encode_request_adu(adu: &mut Adu, hdr: Header, request: &Request<'_>) {
    let len = {
        let mut buf = &mut adu.bytes[..MAX_ADU_LEN - CRC_LEN];
        buf.put_u8(hdr.slave.into());
        encode_request_pdu(&mut buf, request);
        MAX_ADU_LEN - CRC_LEN - buf.len()
    };
    let crc = crc16(&adu.bytes[..len]);
    LittleEndian::write_u16(&mut adu.bytes[len..len + CRC_LEN], crc);
    adu.len = len + CRC_LEN;
}

/// Number of bytes still missing once the response header is complete.
///
/// `byte_count` is the third byte of the response. It counts the data
/// of read responses, whose CRC bytes are already part of the header.
pub(crate) fn remaining_response_len(function: FunctionCode, byte_count: u8) -> usize {
    use crate::frame::FunctionCode::*;
    match function {
        ReadCoils
        | ReadDiscreteInputs
        | ReadHoldingRegisters
        | ReadInputRegisters
        | ReadWriteMultipleRegisters => usize::from(byte_count),
        // address + value/quantity echo: 8 bytes in total
        WriteSingleCoil | WriteSingleRegister | WriteMultipleCoils | WriteMultipleRegisters => 3,
        // address + AND mask + OR mask echo: 10 bytes in total
        MaskWriteRegister => 5,
    }
}

/// Checks the trailing CRC of a complete response.
pub(crate) fn verify_crc(adu: &[u8]) -> Result<(), ProtocolError> {
    let Some(data_len) = adu.len().checked_sub(CRC_LEN) else {
        return Ok(());
    };
    let (data, crc) = adu.split_at(data_len);
    let expected = crc16(data);
    let received = LittleEndian::read_u16(crc);
    if expected != received {
        return Err(ProtocolError::InvalidCrc { expected, received });
    }
    Ok(())
}

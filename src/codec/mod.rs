// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use bytes::BufMut;

use crate::{buffer::WordBuffer, frame::*};

pub(crate) mod rtu;

#[allow(clippy::cast_possible_truncation)]
fn u16_len(len: usize) -> u16 {
    // This type conversion should always be safe, because either
    // the caller is responsible to pass a valid usize or the
    // possible values are limited by the protocol.
    debug_assert!(len <= u16::MAX.into());
    len as u16
}

#[allow(clippy::cast_possible_truncation)]
fn u8_len(len: usize) -> u8 {
    // This type conversion should always be safe, because either
    // the caller is responsible to pass a valid usize or the
    // possible values are limited by the protocol.
    debug_assert!(len <= u8::MAX.into());
    len as u8
}

pub(crate) const fn bool_to_coil(state: Coil) -> Word {
    if state {
        0xFF00
    } else {
        0x0000
    }
}

pub(crate) const fn packed_coils_size(quantity: Quantity) -> usize {
    (quantity as usize + 7) / 8
}

/// Number of transmit words holding the packed bytes of `quantity` coils.
pub(crate) const fn packed_coils_words(quantity: Quantity) -> usize {
    (packed_coils_size(quantity) + 1) / 2
}

pub(crate) fn encode_request_pdu(buf: &mut impl BufMut, request: &Request<'_>) {
    use crate::frame::Request::*;
    buf.put_u8(request.function_code().value());
    match request {
        ReadCoils(address, quantity)
        | ReadDiscreteInputs(address, quantity)
        | ReadInputRegisters(address, quantity)
        | ReadHoldingRegisters(address, quantity) => {
            buf.put_u16(*address);
            buf.put_u16(*quantity);
        }
        WriteSingleCoil(address, coil) => {
            buf.put_u16(*address);
            buf.put_u16(*coil);
        }
        WriteMultipleCoils(address, quantity, packed) => {
            buf.put_u16(*address);
            buf.put_u16(*quantity);
            let byte_count = packed_coils_size(*quantity);
            buf.put_u8(u8_len(byte_count));
            // Each word carries two consecutive coil bytes, lower half first.
            for byte in packed
                .iter()
                .flat_map(|word| word.to_le_bytes())
                .take(byte_count)
            {
                buf.put_u8(byte);
            }
        }
        WriteSingleRegister(address, word) => {
            buf.put_u16(*address);
            buf.put_u16(*word);
        }
        WriteMultipleRegisters(address, words) => {
            buf.put_u16(*address);
            encode_register_data(buf, words);
        }
        MaskWriteRegister(address, and_mask, or_mask) => {
            buf.put_u16(*address);
            buf.put_u16(*and_mask);
            buf.put_u16(*or_mask);
        }
        ReadWriteMultipleRegisters(read_address, quantity, write_address, words) => {
            buf.put_u16(*read_address);
            buf.put_u16(*quantity);
            buf.put_u16(*write_address);
            encode_register_data(buf, words);
        }
    }
}

fn encode_register_data(buf: &mut impl BufMut, words: &[Word]) {
    let len = words.len();
    buf.put_u16(u16_len(len));
    buf.put_u8(u8_len(len * 2));
    for w in words {
        buf.put_u16(*w);
    }
}

/// Decodes the data of a validated response PDU into `response`.
///
/// `pdu` starts with the function code and excludes the CRC. Write
/// confirmations carry no data and leave an empty response behind.
pub(crate) fn decode_response_pdu<const N: usize>(
    function: FunctionCode,
    pdu: &[u8],
    response: &mut WordBuffer<N>,
) {
    use crate::frame::FunctionCode::*;
    let (stored, total) = match function {
        // Packed coil bytes pair up lower half first.
        ReadCoils | ReadDiscreteInputs => decode_words::<LittleEndian, N>(pdu, true, response),
        ReadHoldingRegisters | ReadInputRegisters | ReadWriteMultipleRegisters => {
            decode_words::<BigEndian, N>(pdu, false, response)
        }
        WriteSingleCoil
        | WriteSingleRegister
        | WriteMultipleCoils
        | WriteMultipleRegisters
        | MaskWriteRegister => response.overwrite(std::iter::empty()),
    };
    if stored < total {
        log::warn!(
            "Dropped {} of {} words received for function {}: response buffer holds {}",
            total - stored,
            total,
            function,
            N
        );
    }
}

fn decode_words<B: ByteOrder, const N: usize>(
    pdu: &[u8],
    keep_odd_byte: bool,
    response: &mut WordBuffer<N>,
) -> (usize, usize) {
    let byte_count = pdu.get(1).copied().map_or(0, usize::from);
    let data = pdu.get(2..).unwrap_or_default();
    let data = &data[..byte_count.min(data.len())];
    let pairs = data.chunks_exact(2);
    // An odd trailing byte becomes the low half of a zero-extended word.
    let tail = pairs
        .remainder()
        .first()
        .filter(|_| keep_odd_byte)
        .map(|byte| Word::from(*byte));
    response.overwrite(pairs.map(B::read_u16).chain(tail))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(request: &Request<'_>) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_request_pdu(&mut buf, request);
        buf
    }

    #[test]
    fn convert_bool_to_coil() {
        assert_eq!(bool_to_coil(true), 0xFF00);
        assert_eq!(bool_to_coil(false), 0x0000);
    }

    #[test]
    fn convert_coil_quantity_to_sizes() {
        assert_eq!(packed_coils_size(0), 0);
        assert_eq!(packed_coils_size(1), 1);
        assert_eq!(packed_coils_size(8), 1);
        assert_eq!(packed_coils_size(9), 2);
        assert_eq!(packed_coils_size(17), 3);

        assert_eq!(packed_coils_words(8), 1);
        assert_eq!(packed_coils_words(16), 1);
        assert_eq!(packed_coils_words(17), 2);
    }

    mod serialize_requests {
        use super::*;

        #[test]
        fn read_coils() {
            let bytes = encode(&Request::ReadCoils(0x12, 4));
            assert_eq!(bytes, vec![0x01, 0x00, 0x12, 0x00, 0x04]);
        }

        #[test]
        fn read_discrete_inputs() {
            let bytes = encode(&Request::ReadDiscreteInputs(0x03, 19));
            assert_eq!(bytes, vec![0x02, 0x00, 0x03, 0x00, 19]);
        }

        #[test]
        fn write_single_coil() {
            let bytes = encode(&Request::WriteSingleCoil(0x1234, bool_to_coil(true)));
            assert_eq!(bytes, vec![0x05, 0x12, 0x34, 0xFF, 0x00]);
        }

        #[test]
        fn write_multiple_coils() {
            // 10 coils need 2 bytes: 0b_0000_1101 and 0b_0000_0010.
            let packed = [0x020D];
            let bytes = encode(&Request::WriteMultipleCoils(0x3311, 10, &packed));
            assert_eq!(
                bytes,
                vec![0x0F, 0x33, 0x11, 0x00, 0x0A, 0x02, 0x0D, 0x02]
            );
        }

        #[test]
        fn write_multiple_coils_odd_byte_count() {
            // 17 coils need 3 bytes, the high half of the second word is unused.
            let packed = [0x2211, 0xFF33];
            let bytes = encode(&Request::WriteMultipleCoils(0, 17, &packed));
            assert_eq!(
                bytes,
                vec![0x0F, 0x00, 0x00, 0x00, 0x11, 0x03, 0x11, 0x22, 0x33]
            );
        }

        #[test]
        fn read_input_registers() {
            let bytes = encode(&Request::ReadInputRegisters(0x09, 77));
            assert_eq!(bytes, vec![0x04, 0x00, 0x09, 0x00, 0x4D]);
        }

        #[test]
        fn read_holding_registers() {
            let bytes = encode(&Request::ReadHoldingRegisters(0x09, 77));
            assert_eq!(bytes, vec![0x03, 0x00, 0x09, 0x00, 0x4D]);
        }

        #[test]
        fn write_single_register() {
            let bytes = encode(&Request::WriteSingleRegister(0x07, 0xABCD));
            assert_eq!(bytes, vec![0x06, 0x00, 0x07, 0xAB, 0xCD]);
        }

        #[test]
        fn write_multiple_registers() {
            let bytes = encode(&Request::WriteMultipleRegisters(0x06, &[0xABCD, 0xEF12]));
            assert_eq!(
                bytes,
                vec![0x10, 0x00, 0x06, 0x00, 0x02, 0x04, 0xAB, 0xCD, 0xEF, 0x12]
            );
        }

        #[test]
        fn masked_write_register() {
            let bytes = encode(&Request::MaskWriteRegister(0xABCD, 0xEF12, 0x2345));
            assert_eq!(bytes, vec![0x16, 0xAB, 0xCD, 0xEF, 0x12, 0x23, 0x45]);
        }

        #[test]
        fn read_write_multiple_registers() {
            let data = [0xABCD, 0xEF12];
            let bytes = encode(&Request::ReadWriteMultipleRegisters(0x05, 51, 0x03, &data));
            assert_eq!(
                bytes,
                vec![
                    0x17, 0x00, 0x05, 0x00, 0x33, 0x00, 0x03, 0x00, 0x02, 0x04, 0xAB, 0xCD, 0xEF,
                    0x12
                ]
            );
        }
    }

    mod deserialize_responses {
        use super::*;

        #[test]
        fn read_holding_registers() {
            let mut response = WordBuffer::<8>::new();
            decode_response_pdu(
                FunctionCode::ReadHoldingRegisters,
                &[0x03, 0x04, 0x00, 0x0A, 0x00, 0x14],
                &mut response,
            );
            assert_eq!(response.as_slice(), &[10, 20]);
        }

        #[test]
        fn read_input_registers_ignore_odd_byte() {
            let mut response = WordBuffer::<8>::new();
            decode_response_pdu(
                FunctionCode::ReadInputRegisters,
                &[0x04, 0x03, 0xAA, 0x00, 0x11],
                &mut response,
            );
            assert_eq!(response.as_slice(), &[0xAA00]);
        }

        #[test]
        fn read_coils_odd_byte_is_zero_extended() {
            let mut response = WordBuffer::<8>::new();
            decode_response_pdu(FunctionCode::ReadCoils, &[0x01, 0x01, 0x05], &mut response);
            assert_eq!(response.as_slice(), &[5]);
        }

        #[test]
        fn read_discrete_inputs_low_byte_first() {
            let mut response = WordBuffer::<8>::new();
            decode_response_pdu(
                FunctionCode::ReadDiscreteInputs,
                &[0x02, 0x03, 0xAC, 0xDB, 0x35],
                &mut response,
            );
            assert_eq!(response.as_slice(), &[0xDBAC, 0x0035]);
        }

        #[test]
        fn read_write_multiple_registers() {
            let mut response = WordBuffer::<8>::new();
            decode_response_pdu(
                FunctionCode::ReadWriteMultipleRegisters,
                &[0x17, 0x02, 0x12, 0x34],
                &mut response,
            );
            assert_eq!(response.as_slice(), &[0x1234]);
        }

        #[test]
        fn truncate_to_capacity() {
            let mut response = WordBuffer::<2>::new();
            decode_response_pdu(
                FunctionCode::ReadHoldingRegisters,
                &[0x03, 0x06, 0x00, 0x01, 0x00, 0x02, 0x00, 0x03],
                &mut response,
            );
            assert_eq!(response.len(), 2);
            assert_eq!(response.as_slice(), &[1, 2]);
        }

        #[test]
        fn write_confirmation_has_no_data() {
            let mut response = WordBuffer::<8>::new();
            response.set_words(&[1, 2, 3]).unwrap();
            decode_response_pdu(
                FunctionCode::WriteSingleRegister,
                &[0x06, 0x00, 0x07, 0xAB, 0xCD],
                &mut response,
            );
            assert!(response.is_empty());
        }
    }
}

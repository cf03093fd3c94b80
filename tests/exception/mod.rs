// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use modbus_rtu_master::{
    client::{rtu::Client, Reader as _, Writer as _},
    transport::Transport,
    ExceptionCode, FunctionCode, Slave,
};

use crate::mock::with_crc;

/// A slave that rejects every request with a distinct exception.
pub struct TestSlave {
    pub slave: Slave,
}

impl TestSlave {
    fn handle(&self, function: u8) -> ExceptionCode {
        use FunctionCode::*;

        match function {
            f if f == ReadCoils.value() => ExceptionCode::Acknowledge,
            f if f == ReadDiscreteInputs.value() => ExceptionCode::GatewayPathUnavailable,
            f if f == WriteSingleCoil.value() => ExceptionCode::GatewayTargetDevice,
            f if f == WriteMultipleCoils.value() => ExceptionCode::IllegalDataAddress,
            f if f == ReadInputRegisters.value() => ExceptionCode::IllegalDataValue,
            f if f == ReadHoldingRegisters.value() => ExceptionCode::IllegalFunction,
            f if f == WriteSingleRegister.value() => ExceptionCode::MemoryParityError,
            f if f == WriteMultipleRegisters.value() => ExceptionCode::ServerDeviceBusy,
            f if f == MaskWriteRegister.value() => ExceptionCode::ServerDeviceFailure,
            _ => ExceptionCode::Custom(0x19),
        }
    }

    /// Exception frame answering `request`.
    pub fn respond(&self, request: &[u8]) -> Vec<u8> {
        let function = request[1];
        let exception = self.handle(function);
        with_crc(vec![u8::from(self.slave), function | 0x80, exception.into()])
    }
}

pub fn check_client<T: Transport>(client: &mut Client<T>, slave: Slave) {
    client.set_transmit_words(&[0x0001, 0x0002]).unwrap();

    let response = client.read_coils(slave, 0x00, 2).unwrap();
    assert!(matches!(response, Err(ExceptionCode::Acknowledge)));

    let response = client
        .read_discrete_inputs(slave, 0x00, 2)
        .expect("communication failed");
    assert!(matches!(
        response,
        Err(ExceptionCode::GatewayPathUnavailable)
    ));

    let response = client
        .write_single_coil(slave, 0x00, true)
        .expect("communication failed");
    assert!(matches!(response, Err(ExceptionCode::GatewayTargetDevice)));

    let response = client
        .write_multiple_coils(slave, 0x00, 1)
        .expect("communication failed");
    assert!(matches!(response, Err(ExceptionCode::IllegalDataAddress)));

    let response = client
        .read_input_registers(slave, 0x00, 2)
        .expect("communication failed");
    assert!(matches!(response, Err(ExceptionCode::IllegalDataValue)));

    let response = client
        .read_holding_registers(slave, 0x00, 2)
        .expect("communication failed");
    assert!(matches!(response, Err(ExceptionCode::IllegalFunction)));

    let response = client
        .write_single_register(slave, 0x00, 42)
        .expect("communication failed");
    assert!(matches!(response, Err(ExceptionCode::MemoryParityError)));

    let response = client
        .write_multiple_registers(slave, 0x00, 1)
        .expect("communication failed");
    assert!(matches!(response, Err(ExceptionCode::ServerDeviceBusy)));

    let response = client
        .masked_write_register(slave, 0x00, 0, 0)
        .expect("communication failed");
    assert!(matches!(response, Err(ExceptionCode::ServerDeviceFailure)));

    let response = client
        .read_write_multiple_registers(slave, 0x00, 1, 0x00, 1)
        .expect("communication failed");
    assert!(matches!(response, Err(ExceptionCode::Custom(0x19))));
}

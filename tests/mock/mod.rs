// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code)]

use std::collections::VecDeque;

use modbus_rtu_master::{
    crc16,
    transport::{ByteSink, ByteSource, Clock, Hooks},
};

/// Appends the Modbus CRC, low byte first.
pub fn with_crc(mut frame: Vec<u8>) -> Vec<u8> {
    let crc = crc16(&frame);
    frame.extend_from_slice(&crc.to_le_bytes());
    frame
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    PreTransmission,
    Flush,
    PostTransmission,
}

type Responder = Box<dyn FnMut(&[u8]) -> Vec<u8>>;

/// Scripted serial link with a simulated millisecond clock.
///
/// Every call of [`Clock::millis`] advances the clock by one tick.
pub struct MockTransport {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    request: Vec<u8>,
    now: u32,
    tick: u32,
    responder: Option<Responder>,
    events: Vec<Event>,
    idle_calls: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(now: u32) -> Self {
        Self {
            rx: VecDeque::new(),
            tx: Vec::new(),
            request: Vec::new(),
            now,
            tick: 1,
            responder: None,
            events: Vec::new(),
            idle_calls: 0,
        }
    }

    /// Answers every request by calling `responder` once it has been sent.
    pub fn with_responder(mut self, responder: impl FnMut(&[u8]) -> Vec<u8> + 'static) -> Self {
        self.responder = Some(Box::new(responder));
        self
    }

    pub fn with_tick(mut self, tick: u32) -> Self {
        self.tick = tick;
        self
    }

    /// Queues bytes to be received.
    pub fn respond(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    /// All bytes written so far.
    pub fn sent(&self) -> &[u8] {
        &self.tx
    }

    /// Bytes written since the last `pre_transmission`.
    pub fn last_request(&self) -> &[u8] {
        &self.request
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn idle_calls(&self) -> usize {
        self.idle_calls
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for MockTransport {
    fn byte_available(&mut self) -> bool {
        !self.rx.is_empty()
    }

    fn read_byte(&mut self) -> u8 {
        self.rx.pop_front().expect("no byte available")
    }
}

impl ByteSink for MockTransport {
    fn write_byte(&mut self, byte: u8) {
        self.tx.push(byte);
        self.request.push(byte);
    }

    fn flush(&mut self) {
        self.events.push(Event::Flush);
    }
}

impl Clock for MockTransport {
    fn millis(&mut self) -> u32 {
        let now = self.now;
        self.now = self.now.wrapping_add(self.tick);
        now
    }
}

impl Hooks for MockTransport {
    fn idle(&mut self) {
        self.idle_calls += 1;
    }

    fn pre_transmission(&mut self) {
        self.events.push(Event::PreTransmission);
        self.request.clear();
    }

    fn post_transmission(&mut self) {
        self.events.push(Event::PostTransmission);
        if let Some(responder) = &mut self.responder {
            let response = responder(&self.request);
            self.rx.extend(response);
        }
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

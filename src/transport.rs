// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Byte-level transport abstraction
//!
//! The client drives the link exclusively through these traits. A
//! platform provides one implementation, e.g. on top of a UART driver,
//! and hands it over to [`Client::new`](crate::client::rtu::Client::new).

/// Source of received bytes.
pub trait ByteSource {
    /// Whether a received byte is ready to be read.
    fn byte_available(&mut self) -> bool;

    /// Reads the next received byte.
    ///
    /// Only called after [`Self::byte_available`] returned `true`.
    fn read_byte(&mut self) -> u8;
}

/// Sink for bytes to transmit.
pub trait ByteSink {
    /// Queues a byte for transmission, blocking until it is accepted.
    fn write_byte(&mut self, byte: u8);

    /// Blocks until all queued bytes have been transmitted.
    fn flush(&mut self);
}

/// Monotonic millisecond clock.
///
/// The counter may wrap around.
pub trait Clock {
    fn millis(&mut self) -> u32;
}

/// Optional callbacks around a transaction.
pub trait Hooks {
    /// Invoked while waiting for response bytes.
    ///
    /// May yield to other work but must neither block indefinitely nor
    /// start another transaction.
    fn idle(&mut self) {}

    /// Invoked before the request is written, e.g. to enable an RS-485 driver.
    fn pre_transmission(&mut self) {}

    /// Invoked after the request has been flushed, e.g. to disable an RS-485 driver.
    fn post_transmission(&mut self) {}
}

/// Everything the client needs from the link.
pub trait Transport: ByteSource + ByteSink + Clock + Hooks {}

impl<T> Transport for T where T: ByteSource + ByteSink + Clock + Hooks + ?Sized {}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn byte_available(&mut self) -> bool {
        (**self).byte_available()
    }

    fn read_byte(&mut self) -> u8 {
        (**self).read_byte()
    }
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte);
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn millis(&mut self) -> u32 {
        (**self).millis()
    }
}

impl<T: Hooks + ?Sized> Hooks for &mut T {
    fn idle(&mut self) {
        (**self).idle();
    }

    fn pre_transmission(&mut self) {
        (**self).pre_transmission();
    }

    fn post_transmission(&mut self) {
        (**self).post_transmission();
    }
}

#[cfg(feature = "callbacks")]
pub use self::callbacks::{Builder as CallbackTransportBuilder, CallbackTransport};

#[cfg(feature = "callbacks")]
mod callbacks {
    use std::fmt;

    use super::{ByteSink, ByteSource, Clock, Hooks};
    use crate::Error;

    type Callback<T> = Box<dyn FnMut() -> T>;

    /// A [`Transport`](super::Transport) assembled from individual callbacks.
    pub struct CallbackTransport {
        available: Callback<bool>,
        read_byte: Callback<u8>,
        write_byte: Box<dyn FnMut(u8)>,
        flush: Callback<()>,
        millis: Callback<u32>,
        idle: Option<Callback<()>>,
        pre_transmission: Option<Callback<()>>,
        post_transmission: Option<Callback<()>>,
    }

    impl CallbackTransport {
        #[must_use]
        pub fn builder() -> Builder {
            Builder::default()
        }
    }

    impl fmt::Debug for CallbackTransport {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("CallbackTransport")
                .field("idle", &self.idle.is_some())
                .field("pre_transmission", &self.pre_transmission.is_some())
                .field("post_transmission", &self.post_transmission.is_some())
                .finish_non_exhaustive()
        }
    }

    impl ByteSource for CallbackTransport {
        fn byte_available(&mut self) -> bool {
            (self.available)()
        }

        fn read_byte(&mut self) -> u8 {
            (self.read_byte)()
        }
    }

    impl ByteSink for CallbackTransport {
        fn write_byte(&mut self, byte: u8) {
            (self.write_byte)(byte);
        }

        fn flush(&mut self) {
            (self.flush)();
        }
    }

    impl Clock for CallbackTransport {
        fn millis(&mut self) -> u32 {
            (self.millis)()
        }
    }

    impl Hooks for CallbackTransport {
        fn idle(&mut self) {
            if let Some(idle) = &mut self.idle {
                idle();
            }
        }

        fn pre_transmission(&mut self) {
            if let Some(pre_transmission) = &mut self.pre_transmission {
                pre_transmission();
            }
        }

        fn post_transmission(&mut self) {
            if let Some(post_transmission) = &mut self.post_transmission {
                post_transmission();
            }
        }
    }

    /// Collects the callbacks of a [`CallbackTransport`].
    #[derive(Default)]
    pub struct Builder {
        available: Option<Callback<bool>>,
        read_byte: Option<Callback<u8>>,
        write_byte: Option<Box<dyn FnMut(u8)>>,
        flush: Option<Callback<()>>,
        millis: Option<Callback<u32>>,
        idle: Option<Callback<()>>,
        pre_transmission: Option<Callback<()>>,
        post_transmission: Option<Callback<()>>,
    }

    impl Builder {
        #[must_use]
        pub fn available(mut self, f: impl FnMut() -> bool + 'static) -> Self {
            self.available = Some(Box::new(f));
            self
        }

        #[must_use]
        pub fn read_byte(mut self, f: impl FnMut() -> u8 + 'static) -> Self {
            self.read_byte = Some(Box::new(f));
            self
        }

        #[must_use]
        pub fn write_byte(mut self, f: impl FnMut(u8) + 'static) -> Self {
            self.write_byte = Some(Box::new(f));
            self
        }

        #[must_use]
        pub fn flush(mut self, f: impl FnMut() + 'static) -> Self {
            self.flush = Some(Box::new(f));
            self
        }

        #[must_use]
        pub fn millis(mut self, f: impl FnMut() -> u32 + 'static) -> Self {
            self.millis = Some(Box::new(f));
            self
        }

        #[must_use]
        pub fn idle(mut self, f: impl FnMut() + 'static) -> Self {
            self.idle = Some(Box::new(f));
            self
        }

        #[must_use]
        pub fn pre_transmission(mut self, f: impl FnMut() + 'static) -> Self {
            self.pre_transmission = Some(Box::new(f));
            self
        }

        #[must_use]
        pub fn post_transmission(mut self, f: impl FnMut() + 'static) -> Self {
            self.post_transmission = Some(Box::new(f));
            self
        }

        /// Fails with [`Error::IllegalConfiguration`] naming the first
        /// missing required callback.
        pub fn build(self) -> Result<CallbackTransport, Error> {
            let Self {
                available,
                read_byte,
                write_byte,
                flush,
                millis,
                idle,
                pre_transmission,
                post_transmission,
            } = self;
            Ok(CallbackTransport {
                available: available.ok_or(Error::IllegalConfiguration("available"))?,
                read_byte: read_byte.ok_or(Error::IllegalConfiguration("read_byte"))?,
                write_byte: write_byte.ok_or(Error::IllegalConfiguration("write_byte"))?,
                flush: flush.ok_or(Error::IllegalConfiguration("flush"))?,
                millis: millis.ok_or(Error::IllegalConfiguration("millis"))?,
                idle,
                pre_transmission,
                post_transmission,
            })
        }
    }

}

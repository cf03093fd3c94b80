// SPDX-FileCopyrightText: Copyright (c) 2017-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;

use super::*;

use crate::{ProtocolError, Slave};

/// Address + function code + exception code or byte count + CRC.
///
/// The shortest valid response and the point at which the response
/// header can be inspected.
pub(crate) const HEADER_LEN: usize = 5;

/// Address + function code + byte count + up to 255 data bytes + CRC.
pub(crate) const MAX_ADU_LEN: usize = 3 + u8::MAX as usize + 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Header {
    pub(crate) slave: Slave,
}

/// What the response to a sent request must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RequestContext {
    pub(crate) function_code: FunctionCode,
    pub(crate) header: Header,
}

/// A complete RTU frame on the wire, stored in place.
#[derive(Clone)]
pub(crate) struct Adu {
    pub(crate) bytes: [u8; MAX_ADU_LEN],
    pub(crate) len: usize,
}

impl Adu {
    pub(crate) const fn new() -> Self {
        Self {
            bytes: [0; MAX_ADU_LEN],
            len: 0,
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Appends a received byte.
    ///
    /// Bytes beyond [`MAX_ADU_LEN`] are discarded. The receiver never
    /// requests more than that.
    pub(crate) fn push(&mut self, byte: u8) {
        debug_assert!(self.len < MAX_ADU_LEN);
        if let Some(slot) = self.bytes.get_mut(self.len) {
            *slot = byte;
            self.len += 1;
        }
    }
}

impl fmt::Debug for Adu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X?}", self.as_bytes())
    }
}

/// Check that `req_hdr` addresses the same device as `rsp_hdr`.
pub(crate) fn verify_response_header(
    req_hdr: &Header,
    rsp_hdr: &Header,
) -> Result<(), ProtocolError> {
    if req_hdr != rsp_hdr {
        return Err(ProtocolError::InvalidSlaveId {
            expected: req_hdr.slave,
            received: rsp_hdr.slave,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_same_headers() {
        // Given
        let req_hdr = Header { slave: Slave(0) };
        let rsp_hdr = Header { slave: Slave(0) };

        // When
        let result = verify_response_header(&req_hdr, &rsp_hdr);

        // Then
        assert!(result.is_ok());
    }

    #[test]
    fn invalid_validate_not_same_slave_id() {
        // Given
        let req_hdr = Header { slave: Slave(0) };
        let rsp_hdr = Header { slave: Slave(5) };

        // When
        let result = verify_response_header(&req_hdr, &rsp_hdr);

        // Then
        assert_eq!(
            result,
            Err(ProtocolError::InvalidSlaveId {
                expected: Slave(0),
                received: Slave(5),
            })
        );
    }

    #[test]
    fn push_until_capacity() {
        let mut adu = Adu::new();
        for byte in 0..5 {
            adu.push(byte);
        }
        assert_eq!(adu.len(), HEADER_LEN);
        assert_eq!(adu.as_bytes(), &[0, 1, 2, 3, 4]);
        assert_eq!(format!("{adu:?}"), "[00, 01, 02, 03, 04]");
    }
}

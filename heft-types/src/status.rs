//! Terminal status codes
//!
//! A status travels in the response header as four ASCII hex characters
//! holding the big-endian bytes of the 16-bit value.

use std::fmt;

use crate::error::{Error, Result};

/// 16-bit status carried by every response frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(pub u16);

impl Status {
    /// Width of the status field in the response header
    pub const FIELD_WIDTH: usize = 4;

    pub const SUCCESS: Self = Self(0x0001);
    pub const INVALID_DATA: Self = Self(0x0002);
    pub const PROCESSING_ERROR: Self = Self(0x0003);
    pub const COMMAND_NOT_ALLOWED: Self = Self(0x0004);
    pub const NOT_INITIALISED: Self = Self(0x0005);
    pub const CONNECT_TIMEOUT: Self = Self(0x0006);
    pub const CONNECT_ERROR: Self = Self(0x0007);
    pub const SENDING_ERROR: Self = Self(0x0008);
    pub const RECEIVING_ERROR: Self = Self(0x0009);
    pub const NO_DATA_AVAILABLE: Self = Self(0x000A);
    pub const TRANS_NOT_ALLOWED: Self = Self(0x000B);

    /// Check if this is the success status
    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    /// Encode as the four-character header field
    ///
    /// # Examples
    ///
    /// ```
    /// use heft_types::Status;
    ///
    /// assert_eq!(&Status(0x1A2B).to_field(), b"1A2B");
    /// ```
    pub fn to_field(self) -> [u8; 4] {
        let encoded = hex::encode_upper(self.0.to_be_bytes());
        let mut field = [0u8; 4];
        field.copy_from_slice(encoded.as_bytes());
        field
    }

    /// Decode the four-character header field
    pub fn from_field(field: &[u8]) -> Result<Self> {
        if field.len() != Self::FIELD_WIDTH {
            return Err(Error::Parse(format!(
                "status field must be {} characters, got {}",
                Self::FIELD_WIDTH,
                field.len()
            )));
        }

        let mut raw = [0u8; 2];
        hex::decode_to_slice(field, &mut raw)
            .map_err(|e| Error::Parse(format!("status field {:?}: {}", field, e)))?;

        Ok(Self(u16::from_be_bytes(raw)))
    }

    /// Get status name
    pub fn name(self) -> &'static str {
        match self {
            Self::SUCCESS => "SUCCESS",
            Self::INVALID_DATA => "INVALID_DATA",
            Self::PROCESSING_ERROR => "PROCESSING_ERROR",
            Self::COMMAND_NOT_ALLOWED => "COMMAND_NOT_ALLOWED",
            Self::NOT_INITIALISED => "NOT_INITIALISED",
            Self::CONNECT_TIMEOUT => "CONNECT_TIMEOUT",
            Self::CONNECT_ERROR => "CONNECT_ERROR",
            Self::SENDING_ERROR => "SENDING_ERROR",
            Self::RECEIVING_ERROR => "RECEIVING_ERROR",
            Self::NO_DATA_AVAILABLE => "NO_DATA_AVAILABLE",
            Self::TRANS_NOT_ALLOWED => "TRANS_NOT_ALLOWED",
            _ => "UNKNOWN",
        }
    }
}

impl From<u16> for Status {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<Status> for u16 {
    fn from(status: Status) -> u16 {
        status.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:04X})", self.name(), self.0)
    }
}

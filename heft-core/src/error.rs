//! Error types for heft-core



/// Result type alias for heft operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller-supplied value rejected while building a command
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    
    /// Domain value failed validation
    #[error(transparent)]
    Types(#[from] heft_types::Error),
    
    /// Digits cannot be packed into the requested BCD width
    #[error("Invalid BCD input: expected {expected} decimal digits, got {input:?}")]
    InvalidBcdInput {
        expected: usize,
        input: String,
    },
    
    /// Packed byte holds a nibble above 9
    #[error("Invalid BCD byte 0x{byte:02X} at offset {offset}")]
    InvalidBcdByte {
        byte: u8,
        offset: usize,
    },
    
    /// Frame is too short to hold its header
    #[error("Frame too short: expected at least {expected} bytes, got {actual} bytes")]
    FrameTooShort {
        expected: usize,
        actual: usize,
    },
    
    /// A field runs past the end of the frame
    #[error("Truncated {field}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },
    
    /// Length field is not a zero-padded decimal number
    #[error("Malformed length field: {0:?}")]
    MalformedLength(String),
    
    /// Length field disagrees with the bytes that follow the header
    #[error("Length mismatch: header declares {declared} bytes, frame carries {actual} bytes")]
    LengthMismatch {
        declared: usize,
        actual: usize,
    },
    
    /// Wire input breaks a protocol invariant
    #[error("Protocol violation: {0}")]
    ProtocolViolation(&'static str),
    
    /// Inbound command id is not one this decoder handles
    #[error("Unknown command id: 0x{0:08X}")]
    UnknownCommand(u32),
    
    /// Inbound frame exceeds the configured limit
    #[error("Frame too large: {size} bytes (max: {max} bytes)")]
    FrameTooLarge {
        size: usize,
        max: usize,
    },
    
    /// Payload larger than the length field or a limit allows
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },
}

impl Error {
    /// Check if the caller handed in a bad value
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::Types(_)
                | Self::InvalidBcdInput { .. }
                | Self::PayloadTooLarge { .. }
        )
    }
    
    /// Check if the terminal sent something this decoder does not speak
    pub fn is_communication_error(&self) -> bool {
        matches!(self, Self::UnknownCommand(_))
    }
    
    /// Check if an inbound frame is malformed
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Self::FrameTooShort { .. }
                | Self::FrameTooLarge { .. }
                | Self::Truncated { .. }
                | Self::MalformedLength(_)
                | Self::LengthMismatch { .. }
                | Self::ProtocolViolation(_)
                | Self::InvalidBcdByte { .. }
        )
    }
}

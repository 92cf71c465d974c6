//! Protocol constants

/// Size of the command id field (u32, network order)
pub const COMMAND_ID_SIZE: usize = 4;

/// Width of the ASCII decimal length field
pub const LENGTH_FIELD_WIDTH: usize = 6;

/// Width of the ASCII hex status field in response headers
pub const STATUS_FIELD_WIDTH: usize = 4;

/// Request header: command id + length
pub const REQUEST_HEADER_SIZE: usize = COMMAND_ID_SIZE + LENGTH_FIELD_WIDTH;

/// Response header: command id + status + length
pub const RESPONSE_HEADER_SIZE: usize = COMMAND_ID_SIZE + STATUS_FIELD_WIDTH + LENGTH_FIELD_WIDTH;

/// Largest payload the length field can describe
pub const MAX_PAYLOAD_SIZE: usize = 999_999;

/// Default frame limit for inbound decoding: the largest frame the length
/// field can describe
pub const DEFAULT_MAX_FRAME_SIZE: usize = RESPONSE_HEADER_SIZE + MAX_PAYLOAD_SIZE;

/// Timestamp layout carried by the init command
pub const INIT_DATE_FORMAT: &str = "%Y%m%d%H%M%S";

/// Packed size of the init timestamp (14 digits)
pub const INIT_DATE_SIZE: usize = 7;

/// Packed size of a currency code (4 digits)
pub const CURRENCY_CODE_SIZE: usize = 2;

/// Offsets within a response header
pub mod response {
    use super::*;

    pub const STATUS_OFFSET: usize = COMMAND_ID_SIZE;
    pub const LENGTH_OFFSET: usize = COMMAND_ID_SIZE + STATUS_FIELD_WIDTH;
}

/// Offsets within a request header
pub mod request {
    use super::*;

    pub const LENGTH_OFFSET: usize = COMMAND_ID_SIZE;
}

//! Frame layout, header fixup and header parsing

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use tracing::trace;

use heft_types::Status;

use crate::{
    command::CommandId,
    constants::{
        request, response, COMMAND_ID_SIZE, LENGTH_FIELD_WIDTH, MAX_PAYLOAD_SIZE,
        REQUEST_HEADER_SIZE, RESPONSE_HEADER_SIZE, STATUS_FIELD_WIDTH,
    },
    error::{Error, Result},
    wire::Reader,
};

/// Placeholder written into the length field until the payload is complete
const LENGTH_PLACEHOLDER: [u8; LENGTH_FIELD_WIDTH] = [b'0'; LENGTH_FIELD_WIDTH];

/// Builds one frame: header first, payload appended, length fixed up last
///
/// # Frame Structure
///
/// ```text
/// request:
/// ┌─────────────┬─────────────┬─────────────┐
/// │ Command ID  │   Length    │   Payload   │
/// │   4 bytes   │ 6 ASCII dec │   N bytes   │
/// │ (BE u32)    │ zero-padded │             │
/// └─────────────┴─────────────┴─────────────┘
///
/// response:
/// ┌─────────────┬─────────────┬─────────────┬─────────────┐
/// │ Command ID  │   Status    │   Length    │   Payload   │
/// │   4 bytes   │ 4 ASCII hex │ 6 ASCII dec │   N bytes   │
/// └─────────────┴─────────────┴─────────────┴─────────────┘
/// ```
///
/// # Examples
///
/// ```
/// use bytes::BufMut;
/// use heft_core::{CommandId, FrameBuilder};
///
/// let mut builder = FrameBuilder::request(CommandId::SetLogLevel);
/// builder.payload_mut().put_u8(2);
/// let frame = builder.finish().unwrap();
///
/// assert_eq!(&frame.as_bytes()[4..10], b"000001");
/// ```
#[derive(Debug)]
pub struct FrameBuilder {
    command: CommandId,
    status: Option<Status>,
    header: BytesMut,
    payload: BytesMut,
    length_offset: usize,
}

impl FrameBuilder {
    /// Start a frame with a request header
    pub fn request(command: CommandId) -> Self {
        let mut header = BytesMut::with_capacity(REQUEST_HEADER_SIZE);
        header.put_u32(command.into());
        header.put_slice(&LENGTH_PLACEHOLDER);
        
        Self {
            command,
            status: None,
            header,
            payload: BytesMut::new(),
            length_offset: request::LENGTH_OFFSET,
        }
    }
    
    /// Start a frame with a response header carrying `status`
    pub fn response(command: CommandId, status: Status) -> Self {
        let mut header = BytesMut::with_capacity(RESPONSE_HEADER_SIZE);
        header.put_u32(command.into());
        header.put_slice(&status.to_field());
        header.put_slice(&LENGTH_PLACEHOLDER);
        
        Self {
            command,
            status: Some(status),
            header,
            payload: BytesMut::new(),
            length_offset: response::LENGTH_OFFSET,
        }
    }
    
    /// Buffer holding the payload; the header is kept apart
    pub fn payload_mut(&mut self) -> &mut BytesMut {
        &mut self.payload
    }
    
    /// Bytes appended after the header so far
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
    
    /// Header bytes as they stand before [`finish`](Self::finish)
    pub fn header(&self) -> &[u8] {
        &self.header
    }
    
    /// Write the length field and seal the frame
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the payload cannot be described
    /// by the six-digit length field.
    pub fn finish(self) -> Result<Frame> {
        let Self {
            command,
            status,
            mut header,
            payload,
            length_offset,
        } = self;
        
        let payload_len = payload.len();
        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: payload_len,
                max: MAX_PAYLOAD_SIZE,
            });
        }
        
        let field = format!("{:0width$}", payload_len, width = LENGTH_FIELD_WIDTH);
        let length_field = length_offset..length_offset + LENGTH_FIELD_WIDTH;
        header[length_field].copy_from_slice(field.as_bytes());
        header.unsplit(payload);
        
        trace!(
            command = %command,
            payload_len = payload_len,
            frame_len = header.len(),
            "Encoded frame"
        );
        
        Ok(Frame {
            command,
            status,
            bytes: header.freeze(),
        })
    }
}

/// Parsed frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Command id
    pub command: CommandId,
    
    /// Status, present only on response headers
    pub status: Option<Status>,
    
    /// Payload length declared by the length field
    pub payload_len: usize,
}

impl FrameHeader {
    /// Read the raw command id without interpreting the rest of the header
    pub fn peek_command(buf: &[u8]) -> Result<u32> {
        if buf.len() < COMMAND_ID_SIZE {
            return Err(Error::FrameTooShort {
                expected: COMMAND_ID_SIZE,
                actual: buf.len(),
            });
        }
        Reader::new(buf).read_u32("command id")
    }
    
    /// Parse the header at the start of `buf`
    ///
    /// The header layout (request or response) follows from the command id.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let command = CommandId::try_from(Self::peek_command(buf)?)?;
        let header_len = Self::size_for(command);
        
        if buf.len() < header_len {
            return Err(Error::FrameTooShort {
                expected: header_len,
                actual: buf.len(),
            });
        }
        
        let mut reader = Reader::new(buf);
        reader.read_u32("command id")?;
        
        let status = if command.is_response() {
            let field = reader.read_bytes("status", STATUS_FIELD_WIDTH)?;
            let status = Status::from_field(field)
                .map_err(|_| Error::ProtocolViolation("status field is not hex"))?;
            Some(status)
        } else {
            None
        };
        
        let payload_len = parse_length_field(reader.read_bytes("length", LENGTH_FIELD_WIDTH)?)?;
        
        Ok(Self {
            command,
            status,
            payload_len,
        })
    }
    
    /// Header size for frames carrying `command`
    pub fn size_for(command: CommandId) -> usize {
        if command.is_response() {
            RESPONSE_HEADER_SIZE
        } else {
            REQUEST_HEADER_SIZE
        }
    }
    
    /// Header size of this frame
    pub fn size(&self) -> usize {
        Self::size_for(self.command)
    }
}

fn parse_length_field(field: &[u8]) -> Result<usize> {
    if !field.iter().all(u8::is_ascii_digit) {
        return Err(Error::MalformedLength(
            String::from_utf8_lossy(field).into_owned(),
        ));
    }
    
    Ok(field
        .iter()
        .fold(0usize, |acc, digit| acc * 10 + usize::from(digit - b'0')))
}

/// One complete, validated wire frame
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    command: CommandId,
    status: Option<Status>,
    bytes: Bytes,
}

impl Frame {
    /// Validate a raw inbound frame
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The command id is unknown
    /// - The buffer is shorter than the header
    /// - The length field is not decimal or disagrees with the payload size
    ///
    /// # Examples
    ///
    /// ```
    /// use heft_core::{CommandId, Frame, FrameBuilder};
    ///
    /// let sent = FrameBuilder::request(CommandId::Idle).finish().unwrap();
    /// let received = Frame::decode(sent.as_bytes().to_vec()).unwrap();
    ///
    /// assert_eq!(received.command(), CommandId::Idle);
    /// ```
    pub fn decode(buf: impl Into<Bytes>) -> Result<Self> {
        let bytes = buf.into();
        let header = FrameHeader::parse(&bytes)?;
        
        let actual = bytes.len() - header.size();
        if actual != header.payload_len {
            return Err(Error::LengthMismatch {
                declared: header.payload_len,
                actual,
            });
        }
        
        Ok(Self {
            command: header.command,
            status: header.status,
            bytes,
        })
    }
    
    /// Command id
    pub fn command(&self) -> CommandId {
        self.command
    }
    
    /// Status, for response frames
    pub fn status(&self) -> Option<Status> {
        self.status
    }
    
    /// Status of a response frame
    ///
    /// # Errors
    ///
    /// Returns a protocol violation if this is a request frame.
    pub fn response_status(&self) -> Result<Status> {
        self.status
            .ok_or(Error::ProtocolViolation("response expected, got a request frame"))
    }
    
    /// Bytes after the header
    pub fn payload(&self) -> &[u8] {
        &self.bytes[FrameHeader::size_for(self.command)..]
    }
    
    /// Complete frame bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
    
    /// Hand the frame bytes to a transport
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
    
    /// Get total frame size
    pub fn len(&self) -> usize {
        self.bytes.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("command", &self.command)
            .field("status", &self.status())
            .field("payload_len", &self.payload().len())
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame[{}](len={})", self.command, self.payload().len())
    }
}

//! Host proxy commands
//!
//! The terminal has no network stack of its own; it asks the controlling
//! application to connect, send, receive and disconnect on its behalf.
//! Requests arrive from the terminal, responses go back to it.

use std::borrow::Cow;

use bytes::{BufMut, Bytes};
use tracing::{debug, warn};

use heft_types::Status;

use crate::{
    command::CommandId,
    error::{Error, Result},
    frame::{Frame, FrameBuilder, FrameHeader},
    wire::{self, Reader},
};

/// Open a connection to the terminal's host
///
/// ```text
/// ┌──────────┬──────────────┬─────────┬─────────┐
/// │ Addr len │ Remote addr  │  Port   │ Timeout │
/// │  1 byte  │ Addr len     │ BE u16  │ BE u16  │
/// └──────────┴──────────────┴─────────┴─────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    /// Address bytes as the terminal sent them
    pub remote_address: Bytes,
    pub port: u16,
    pub timeout: u16,
}

impl ConnectRequest {
    /// Parse the payload of a connect frame
    ///
    /// # Errors
    ///
    /// A zero address length is a protocol violation; port and timeout are
    /// not read in that case. Address bytes are taken as they are.
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(payload);
        
        let address = reader.read_u8_prefixed("remote address")?;
        if address.is_empty() {
            return Err(Error::ProtocolViolation("connect request has an empty remote address"));
        }
        
        Ok(Self {
            remote_address: Bytes::copy_from_slice(address),
            port: reader.read_u16("port")?,
            timeout: reader.read_u16("timeout")?,
        })
    }
    
    pub fn encode(&self) -> Result<Frame> {
        if self.remote_address.is_empty() {
            return Err(Error::InvalidArgument("remote address must not be empty".into()));
        }
        
        let mut builder = FrameBuilder::request(CommandId::HostConnect);
        let buf = builder.payload_mut();
        wire::put_u8_prefixed(buf, &self.remote_address)?;
        buf.put_u16(self.port);
        buf.put_u16(self.timeout);
        builder.finish()
    }
    
    /// Address as text, with invalid UTF-8 replaced
    pub fn remote_address_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.remote_address)
    }
}

/// Forward a block of data to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub timeout: u16,
    pub data: Bytes,
}

impl SendRequest {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(payload);
        
        Ok(Self {
            timeout: reader.read_u16("timeout")?,
            data: Bytes::copy_from_slice(reader.read_u16_prefixed("data")?),
        })
    }
    
    pub fn encode(&self) -> Result<Frame> {
        let mut builder = FrameBuilder::request(CommandId::HostSend);
        let buf = builder.payload_mut();
        buf.put_u16(self.timeout);
        wire::put_u16_prefixed(buf, &self.data)?;
        builder.finish()
    }
}

/// Read up to `data_len` bytes from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveRequest {
    pub timeout: u16,
    pub data_len: u16,
}

impl ReceiveRequest {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(payload);
        
        Ok(Self {
            timeout: reader.read_u16("timeout")?,
            data_len: reader.read_u16("data length")?,
        })
    }
    
    pub fn encode(&self) -> Result<Frame> {
        let mut builder = FrameBuilder::request(CommandId::HostReceive);
        let buf = builder.payload_mut();
        buf.put_u16(self.timeout);
        buf.put_u16(self.data_len);
        builder.finish()
    }
}

/// Close the host connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisconnectRequest;

impl DisconnectRequest {
    pub fn decode(_payload: &[u8]) -> Result<Self> {
        Ok(Self)
    }
    
    pub fn encode(&self) -> Result<Frame> {
        FrameBuilder::request(CommandId::HostDisconnect).finish()
    }
}

/// Host proxy request decoded from a terminal frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    Connect(ConnectRequest),
    Send(SendRequest),
    Receive(ReceiveRequest),
    Disconnect(DisconnectRequest),
}

impl HostRequest {
    /// Build the host request a raw terminal frame describes
    ///
    /// The command id is checked before anything else is parsed; an id
    /// outside the host proxy set is logged and rejected as a communication
    /// error.
    ///
    /// # Examples
    ///
    /// ```
    /// use heft_core::{HostRequest, ReceiveRequest};
    ///
    /// let frame = ReceiveRequest { timeout: 30, data_len: 512 }.encode().unwrap();
    /// let request = HostRequest::create(frame.into_bytes()).unwrap();
    ///
    /// assert!(matches!(request, HostRequest::Receive(r) if r.data_len == 512));
    /// ```
    pub fn create(buf: impl Into<Bytes>) -> Result<Self> {
        let bytes = buf.into();
        let raw = FrameHeader::peek_command(&bytes)?;
        
        let command = match CommandId::try_from(raw) {
            Ok(command) if command.is_host_request() => command,
            _ => {
                warn!(command = format!("0x{:08X}", raw), "Unknown host packet");
                return Err(Error::UnknownCommand(raw));
            }
        };
        
        let frame = Frame::decode(bytes)?;
        let payload = frame.payload();
        
        let request = match command {
            CommandId::HostConnect => Self::Connect(ConnectRequest::decode(payload)?),
            CommandId::HostSend => Self::Send(SendRequest::decode(payload)?),
            CommandId::HostReceive => Self::Receive(ReceiveRequest::decode(payload)?),
            _ => Self::Disconnect(DisconnectRequest::decode(payload)?),
        };
        
        debug!(command = %command, payload_len = payload.len(), "Decoded host request");
        
        Ok(request)
    }
    
    pub fn command_id(&self) -> CommandId {
        match self {
            Self::Connect(_) => CommandId::HostConnect,
            Self::Send(_) => CommandId::HostSend,
            Self::Receive(_) => CommandId::HostReceive,
            Self::Disconnect(_) => CommandId::HostDisconnect,
        }
    }
    
    pub fn encode(&self) -> Result<Frame> {
        match self {
            Self::Connect(request) => request.encode(),
            Self::Send(request) => request.encode(),
            Self::Receive(request) => request.encode(),
            Self::Disconnect(request) => request.encode(),
        }
    }
}

/// Data read from the host, returned to the terminal
///
/// ```text
/// ┌──────────────┬─────────────┐
/// │  Data len    │    Data     │
/// │  BE u32      │  Data len   │
/// └──────────────┴─────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveResponse {
    pub status: Status,
    pub data: Bytes,
}

impl ReceiveResponse {
    /// Successful receive carrying `data`
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            status: Status::SUCCESS,
            data: data.into(),
        }
    }
    
    pub fn encode(&self) -> Result<Frame> {
        let mut builder = FrameBuilder::response(CommandId::HostReceiveResponse, self.status);
        wire::put_u32_prefixed(builder.payload_mut(), &self.data)?;
        builder.finish()
    }
    
    pub fn decode(frame: &Frame) -> Result<Self> {
        if frame.command() != CommandId::HostReceiveResponse {
            return Err(Error::UnknownCommand(frame.command().into()));
        }
        
        let mut reader = Reader::new(frame.payload());
        
        Ok(Self {
            status: frame.response_status()?,
            data: Bytes::copy_from_slice(reader.read_u32_prefixed("data")?),
        })
    }
}

/// Outcome of a host proxy request, sent back to the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostResponse {
    Connect { status: Status },
    Send { status: Status },
    Receive(ReceiveResponse),
    Disconnect { status: Status },
}

impl HostResponse {
    pub fn command_id(&self) -> CommandId {
        match self {
            Self::Connect { .. } => CommandId::HostConnectResponse,
            Self::Send { .. } => CommandId::HostSendResponse,
            Self::Receive(_) => CommandId::HostReceiveResponse,
            Self::Disconnect { .. } => CommandId::HostDisconnectResponse,
        }
    }
    
    pub fn status(&self) -> Status {
        match self {
            Self::Connect { status } | Self::Send { status } | Self::Disconnect { status } => {
                *status
            }
            Self::Receive(response) => response.status,
        }
    }
    
    pub fn encode(&self) -> Result<Frame> {
        match self {
            Self::Receive(response) => response.encode(),
            _ => FrameBuilder::response(self.command_id(), self.status()).finish(),
        }
    }
    
    pub fn decode(frame: &Frame) -> Result<Self> {
        match frame.command() {
            CommandId::HostConnectResponse => Ok(Self::Connect {
                status: frame.response_status()?,
            }),
            CommandId::HostSendResponse => Ok(Self::Send {
                status: frame.response_status()?,
            }),
            CommandId::HostReceiveResponse => ReceiveResponse::decode(frame).map(Self::Receive),
            CommandId::HostDisconnectResponse => Ok(Self::Disconnect {
                status: frame.response_status()?,
            }),
            other => Err(Error::UnknownCommand(other.into())),
        }
    }
}

//! Inbound frame dispatch
//!
//! [`HostRequest::create`] covers the host proxy ids only. [`Dispatcher`]
//! is the entry point for everything the terminal initiates.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::{
    command::CommandId,
    constants::DEFAULT_MAX_FRAME_SIZE,
    error::{Error, Result},
    frame::{Frame, FrameHeader},
    host::HostRequest,
    signature::{ChallengeRequest, SignatureRequest},
};

/// Command initiated by the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Host(HostRequest),
    Signature(SignatureRequest),
    Challenge(ChallengeRequest),
}

impl Inbound {
    pub fn command_id(&self) -> CommandId {
        match self {
            Self::Host(request) => request.command_id(),
            Self::Signature(_) => CommandId::Signature,
            Self::Challenge(_) => CommandId::Challenge,
        }
    }
}

/// Decodes raw terminal frames into typed commands
///
/// # Examples
///
/// ```
/// use heft_core::{Dispatcher, DisconnectRequest, Inbound, HostRequest};
///
/// let dispatcher = Dispatcher::new().with_max_frame_size(4096);
/// let frame = DisconnectRequest.encode().unwrap();
///
/// let inbound = dispatcher.decode(frame.into_bytes()).unwrap();
/// assert!(matches!(inbound, Inbound::Host(HostRequest::Disconnect(_))));
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    max_frame_size: usize,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
    
    /// Reject frames longer than `size` bytes before parsing them
    pub fn with_max_frame_size(mut self, size: usize) -> Self {
        self.max_frame_size = size;
        self
    }
    
    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }
    
    /// Decode one complete frame
    ///
    /// # Errors
    ///
    /// Unknown or unexpected command ids are logged and returned as
    /// [`Error::UnknownCommand`]. Oversized or malformed frames are
    /// protocol violations.
    pub fn decode(&self, buf: impl Into<Bytes>) -> Result<Inbound> {
        let bytes = buf.into();
        
        if bytes.len() > self.max_frame_size {
            return Err(Error::FrameTooLarge {
                size: bytes.len(),
                max: self.max_frame_size,
            });
        }
        
        let raw = FrameHeader::peek_command(&bytes)?;
        
        let inbound = match CommandId::try_from(raw) {
            Ok(command) if command.is_host_request() => Inbound::Host(HostRequest::create(bytes)?),
            Ok(CommandId::Signature) => {
                let frame = Frame::decode(bytes)?;
                let request = SignatureRequest::decode(frame.payload())?;
                debug!(xml_len = request.xml_details.len(), "Decoded signature request");
                Inbound::Signature(request)
            }
            Ok(CommandId::Challenge) => {
                let frame = Frame::decode(bytes)?;
                let request = ChallengeRequest::decode(frame.payload())?;
                debug!(xml_len = request.xml_details.len(), "Decoded challenge request");
                Inbound::Challenge(request)
            }
            _ => {
                warn!(command = format!("0x{:08X}", raw), "Unknown inbound command");
                return Err(Error::UnknownCommand(raw));
            }
        };
        
        Ok(inbound)
    }
}

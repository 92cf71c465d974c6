//! Signature and challenge exchange
//!
//! Signature and challenge payloads are opaque here; signing and
//! verification happen elsewhere.

use std::borrow::Cow;

use bytes::Bytes;

use heft_types::Status;

use crate::{
    command::CommandId,
    error::{Error, Result},
    frame::{Frame, FrameBuilder},
    wire::{self, Reader},
};

fn expect_command(frame: &Frame, expected: CommandId) -> Result<()> {
    if frame.command() != expected {
        return Err(Error::UnknownCommand(frame.command().into()));
    }
    Ok(())
}

/// Terminal asks for a signature on a receipt
///
/// ```text
/// ┌─────────────┬──────────┬─────────────┬──────────────┐
/// │ Receipt len │ Receipt  │   XML len   │ XML details  │
/// │   BE u16    │          │   BE u32    │              │
/// └─────────────┴──────────┴─────────────┴──────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureRequest {
    pub receipt: Bytes,
    pub xml_details: Bytes,
}

impl SignatureRequest {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(payload);
        
        Ok(Self {
            receipt: Bytes::copy_from_slice(reader.read_u16_prefixed("receipt")?),
            xml_details: Bytes::copy_from_slice(reader.read_u32_prefixed("xml details")?),
        })
    }
    
    pub fn encode(&self) -> Result<Frame> {
        let mut builder = FrameBuilder::request(CommandId::Signature);
        let buf = builder.payload_mut();
        wire::put_u16_prefixed(buf, &self.receipt)?;
        wire::put_u32_prefixed(buf, &self.xml_details)?;
        builder.finish()
    }
    
    pub fn receipt_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.receipt)
    }
    
    pub fn xml_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.xml_details)
    }
}

/// Terminal issues a challenge nonce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRequest {
    pub random_num: Bytes,
    pub xml_details: Bytes,
}

impl ChallengeRequest {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(payload);
        
        Ok(Self {
            random_num: Bytes::copy_from_slice(reader.read_u16_prefixed("random number")?),
            xml_details: Bytes::copy_from_slice(reader.read_u32_prefixed("xml details")?),
        })
    }
    
    pub fn encode(&self) -> Result<Frame> {
        let mut builder = FrameBuilder::request(CommandId::Challenge);
        let buf = builder.payload_mut();
        wire::put_u16_prefixed(buf, &self.random_num)?;
        wire::put_u32_prefixed(buf, &self.xml_details)?;
        builder.finish()
    }
    
    pub fn xml_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.xml_details)
    }
}

/// Answer to a challenge: the `mx` and `zx` values, in that order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeResponse {
    pub status: Status,
    pub mx: Bytes,
    pub zx: Bytes,
}

impl ChallengeResponse {
    /// Successful response carrying `mx` and `zx`
    pub fn new(mx: impl Into<Bytes>, zx: impl Into<Bytes>) -> Self {
        Self {
            status: Status::SUCCESS,
            mx: mx.into(),
            zx: zx.into(),
        }
    }
    
    pub fn encode(&self) -> Result<Frame> {
        let mut builder = FrameBuilder::response(CommandId::ChallengeResponse, self.status);
        let buf = builder.payload_mut();
        wire::put_challenge_segment(buf, &self.mx)?;
        wire::put_challenge_segment(buf, &self.zx)?;
        builder.finish()
    }
    
    pub fn decode(frame: &Frame) -> Result<Self> {
        expect_command(frame, CommandId::ChallengeResponse)?;
        let mut reader = Reader::new(frame.payload());
        
        Ok(Self {
            status: frame.response_status()?,
            mx: Bytes::copy_from_slice(reader.read_u16_prefixed("mx")?),
            zx: Bytes::copy_from_slice(reader.read_u16_prefixed("zx")?),
        })
    }
}

/// Acknowledges a signature request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureResponse {
    pub status: Status,
}

impl SignatureResponse {
    pub fn encode(&self) -> Result<Frame> {
        FrameBuilder::response(CommandId::SignatureResponse, self.status).finish()
    }
    
    pub fn decode(frame: &Frame) -> Result<Self> {
        expect_command(frame, CommandId::SignatureResponse)?;
        
        Ok(Self {
            status: frame.response_status()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RESPONSE_HEADER_SIZE;
    use pretty_assertions::assert_eq;
    
    #[test]
    fn test_signature_decode() {
        let mut payload = vec![0x00, 0x04];
        payload.extend_from_slice(b"RCPT");
        payload.extend_from_slice(&[0x00, 0x00, 0x00, 0x07]);
        payload.extend_from_slice(b"<x></x>");
        
        let request = SignatureRequest::decode(&payload).unwrap();
        
        assert_eq!(request.receipt_text(), "RCPT");
        assert_eq!(request.xml_text(), "<x></x>");
    }
    
    #[test]
    fn test_signature_xml_length_high_byte() {
        // A length with the top bit set is huge, not negative
        let payload = [0x00, 0x00, 0x80, 0x00, 0x00, 0x00];
        let result = SignatureRequest::decode(&payload);
        
        assert!(matches!(
            result,
            Err(Error::Truncated { field: "xml details", needed: 0x8000_0000, .. })
        ));
    }
    
    #[test]
    fn test_challenge_decode() {
        let mut payload = vec![0x00, 0x03, 0x11, 0x22, 0x33];
        payload.extend_from_slice(&[0x00, 0x00, 0x00, 0x02]);
        payload.extend_from_slice(b"<>");
        
        let request = ChallengeRequest::decode(&payload).unwrap();
        
        assert_eq!(request.random_num.as_ref(), &[0x11, 0x22, 0x33]);
        assert_eq!(request.xml_text(), "<>");
    }
    
    #[test]
    fn test_challenge_decode_truncated_xml() {
        let payload = [0x00, 0x01, 0xAA, 0x00, 0x00, 0x00, 0x05, b'<'];
        let err = ChallengeRequest::decode(&payload).unwrap_err();
        assert!(err.is_protocol_violation());
        assert!(!err.is_invalid_argument());
    }
    
    #[test]
    fn test_challenge_response_truncated_segment() {
        // mx claims four bytes, only two follow
        let mut raw = b"\x00\x00\x83\x01".to_vec();
        raw.extend_from_slice(b"0001000004");
        raw.extend_from_slice(&[0x00, 0x04, 0xA1, 0xA2]);
        
        let frame = Frame::decode(raw).unwrap();
        let err = ChallengeResponse::decode(&frame).unwrap_err();
        assert!(matches!(err, Error::Truncated { field: "mx", needed: 4, remaining: 2 }));
        assert!(err.is_protocol_violation());
        
        // zx length prefix cut in half
        let mut raw = b"\x00\x00\x83\x01".to_vec();
        raw.extend_from_slice(b"0001000003");
        raw.extend_from_slice(&[0x00, 0x00, 0x00]);
        
        let frame = Frame::decode(raw).unwrap();
        let err = ChallengeResponse::decode(&frame).unwrap_err();
        assert!(err.is_protocol_violation());
    }
    
    #[test]
    fn test_challenge_response_keeps_failure_status() {
        let sent = ChallengeResponse {
            status: Status::INVALID_DATA,
            mx: Bytes::from_static(b"m"),
            zx: Bytes::from_static(b"z"),
        };
        
        let frame = Frame::decode(sent.encode().unwrap().into_bytes()).unwrap();
        let received = ChallengeResponse::decode(&frame).unwrap();
        assert_eq!(received.status, Status::INVALID_DATA);
    }
    
    #[test]
    fn test_challenge_response_layout() {
        let frame = ChallengeResponse::new(vec![0xA1u8, 0xA2], vec![0xB1u8, 0xB2, 0xB3])
            .encode()
            .unwrap();
        
        assert_eq!(frame.command(), CommandId::ChallengeResponse);
        assert_eq!(&frame.as_bytes()[4..14], b"0001000009");
        assert_eq!(
            frame.payload(),
            &[0x00, 0x02, 0xA1, 0xA2, 0x00, 0x03, 0xB1, 0xB2, 0xB3]
        );
        assert_eq!(frame.len(), RESPONSE_HEADER_SIZE + 9);
    }
    
    #[test]
    fn test_challenge_response_decode_back() {
        let mx: Vec<u8> = (0..=255).collect();
        let zx = vec![0x5Au8; 3];
        let sent = ChallengeResponse::new(mx.clone(), zx.clone());
        
        let frame = Frame::decode(sent.encode().unwrap().into_bytes()).unwrap();
        let received = ChallengeResponse::decode(&frame).unwrap();
        
        assert_eq!(received.mx.as_ref(), mx.as_slice());
        assert_eq!(received.zx.as_ref(), zx.as_slice());
        assert_eq!(received.status, Status::SUCCESS);
    }
    
    #[test]
    fn test_challenge_response_empty_segments() {
        let sent = ChallengeResponse::new(Bytes::new(), Bytes::new());
        let frame = sent.encode().unwrap();
        
        assert_eq!(frame.payload(), &[0x00, 0x00, 0x00, 0x00]);
        assert_eq!(ChallengeResponse::decode(&frame).unwrap(), sent);
    }
    
    #[test]
    fn test_request_encode_decode() {
        let signature = SignatureRequest {
            receipt: Bytes::from_static(b"TOTAL 12.34"),
            xml_details: Bytes::from_static(b"<sig/>"),
        };
        let frame = signature.encode().unwrap();
        assert_eq!(SignatureRequest::decode(frame.payload()).unwrap(), signature);
        
        let challenge = ChallengeRequest {
            random_num: Bytes::from_static(&[9, 8, 7, 6]),
            xml_details: Bytes::new(),
        };
        let frame = challenge.encode().unwrap();
        assert_eq!(ChallengeRequest::decode(frame.payload()).unwrap(), challenge);
    }
    
    #[test]
    fn test_signature_response() {
        let response = SignatureResponse { status: Status::INVALID_DATA };
        let frame = response.encode().unwrap();
        
        assert_eq!(frame.status(), Some(Status::INVALID_DATA));
        assert_eq!(SignatureResponse::decode(&frame).unwrap(), response);
        assert!(ChallengeResponse::decode(&frame).is_err());
    }
}

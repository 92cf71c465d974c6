//! # heft
//!
//! Rust implementation of the HEFT payment-terminal link protocol codec.
//!
//! ## Features
//!
//! - Typed requests for initialization, finance, debug and log control
//! - Host proxy and challenge/signature exchange, both directions
//! - Bounds-checked decoding of everything the terminal sends
//! - No I/O: frames go to and come from whatever transport you use
//!
//! ## Quick Start
//!
//! ```
//! use heft::{Dispatcher, Inbound, HostRequest, ReceiveResponse, Request};
//!
//! fn main() -> heft::Result<()> {
//!     // Build a sale and hand the bytes to the transport
//!     let sale = Request::sale("EUR", 1999, true)?.encode()?;
//!     assert_eq!(sale.payload().len(), 7);
//!
//!     // Something the terminal sent back
//!     let raw = heft::ReceiveRequest { timeout: 30, data_len: 256 }.encode()?.into_bytes();
//!
//!     match Dispatcher::new().decode(raw)? {
//!         Inbound::Host(HostRequest::Receive(request)) => {
//!             let reply = ReceiveResponse::new(vec![0u8; usize::from(request.data_len)]);
//!             let _frame = reply.encode()?;
//!         }
//!         other => println!("unexpected: {:?}", other),
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-exports
pub use heft_core::{
    bcd, wire, ChallengeRequest, ChallengeResponse, CommandId, ConnectRequest, DisconnectRequest,
    Dispatcher, Error, FinanceRequest, FinanceVRequest, Frame, FrameBuilder, FrameHeader,
    HostRequest, HostResponse, Inbound, ReceiveRequest, ReceiveResponse, Request, Result,
    SendRequest, SignatureRequest, SignatureResponse,
};

// Re-export types
pub use heft_types::{CurrencyCode, LogLevel, Status};

pub use bytes::Bytes;

//! # heft-core
//!
//! Core codec for the HEFT payment-terminal link protocol.
//!
//! This crate provides the low-level protocol primitives:
//! - Packed BCD and network-order field helpers
//! - Frame header encoding and validation
//! - Command ids
//! - Typed requests and responses, and inbound dispatch

pub mod bcd;
pub mod command;
pub mod constants;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod host;
pub mod request;
pub mod signature;
pub mod wire;

pub use command::CommandId;
pub use dispatch::{Dispatcher, Inbound};
pub use error::{Error, Result};
pub use frame::{Frame, FrameBuilder, FrameHeader};
pub use host::{
    ConnectRequest, DisconnectRequest, HostRequest, HostResponse, ReceiveRequest, ReceiveResponse,
    SendRequest,
};
pub use request::{FinanceRequest, FinanceVRequest, Request};
pub use signature::{ChallengeRequest, ChallengeResponse, SignatureRequest, SignatureResponse};

pub use heft_types::{CurrencyCode, LogLevel, Status};

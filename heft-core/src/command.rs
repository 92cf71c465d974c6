//! Command identifiers
//!
//! Ids are grouped by family in the second byte. Responses to a request
//! share its id with bit 15 set.

use std::fmt;

use crate::error::{Error, Result};

/// Protocol command ids
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CommandId {
    // Link management
    Init = 0x0000_0001,
    Idle = 0x0000_0002,
    
    // Financial transactions
    FinanceInit = 0x0000_0100,
    Sale = 0x0000_0101,
    Refund = 0x0000_0102,
    SaleV = 0x0000_0103,
    RefundV = 0x0000_0104,
    StartOfDay = 0x0000_0105,
    EndOfDay = 0x0000_0106,
    
    // Host proxy (terminal asks us to talk to its host)
    HostConnect = 0x0000_0200,
    HostSend = 0x0000_0201,
    HostReceive = 0x0000_0202,
    HostDisconnect = 0x0000_0203,
    HostConnectResponse = 0x0000_8200,
    HostSendResponse = 0x0000_8201,
    HostReceiveResponse = 0x0000_8202,
    HostDisconnectResponse = 0x0000_8203,
    
    // Signature and challenge exchange
    Signature = 0x0000_0300,
    Challenge = 0x0000_0301,
    SignatureResponse = 0x0000_8300,
    ChallengeResponse = 0x0000_8301,
    
    // Debug controls
    DebugEnable = 0x0000_0400,
    DebugDisable = 0x0000_0401,
    DebugReset = 0x0000_0402,
    DebugInfo = 0x0000_0403,
    
    // Terminal log controls
    SetLogLevel = 0x0000_0500,
    ResetLogInfo = 0x0000_0501,
    GetLogInfo = 0x0000_0502,
}

impl CommandId {
    const RESPONSE_BIT: u32 = 0x0000_8000;
    
    /// Check if the terminal sends this to ask for host proxying
    pub fn is_host_request(self) -> bool {
        matches!(
            self,
            Self::HostConnect | Self::HostSend | Self::HostReceive | Self::HostDisconnect
        )
    }
    
    /// Check if this id carries a response header (status field)
    pub fn is_response(self) -> bool {
        u32::from(self) & Self::RESPONSE_BIT != 0
    }
    
    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::Init => "CMD_INIT_REQ",
            Self::Idle => "CMD_IDLE_REQ",
            Self::FinanceInit => "CMD_FIN_INIT_REQ",
            Self::Sale => "CMD_FIN_SALE_REQ",
            Self::Refund => "CMD_FIN_REFUND_REQ",
            Self::SaleV => "CMD_FIN_SALEV_REQ",
            Self::RefundV => "CMD_FIN_REFUNDV_REQ",
            Self::StartOfDay => "CMD_FIN_STARTDAY_REQ",
            Self::EndOfDay => "CMD_FIN_ENDDAY_REQ",
            Self::HostConnect => "CMD_HOST_CONN_REQ",
            Self::HostSend => "CMD_HOST_SEND_REQ",
            Self::HostReceive => "CMD_HOST_RECV_REQ",
            Self::HostDisconnect => "CMD_HOST_DISC_REQ",
            Self::HostConnectResponse => "CMD_HOST_CONN_RSP",
            Self::HostSendResponse => "CMD_HOST_SEND_RSP",
            Self::HostReceiveResponse => "CMD_HOST_RECV_RSP",
            Self::HostDisconnectResponse => "CMD_HOST_DISC_RSP",
            Self::Signature => "CMD_STAT_SIGN_REQ",
            Self::Challenge => "CMD_STAT_CHALENGE_REQ",
            Self::SignatureResponse => "CMD_STAT_SIGN_RSP",
            Self::ChallengeResponse => "CMD_STAT_CHALENGE_RSP",
            Self::DebugEnable => "CMD_DBG_ENABLE_REQ",
            Self::DebugDisable => "CMD_DBG_DISABLE_REQ",
            Self::DebugReset => "CMD_DBG_RESET_REQ",
            Self::DebugInfo => "CMD_DBG_INFO_REQ",
            Self::SetLogLevel => "CMD_LOG_SET_LEV_REQ",
            Self::ResetLogInfo => "CMD_LOG_RST_INF_REQ",
            Self::GetLogInfo => "CMD_LOG_GET_INF_REQ",
        }
    }
}

impl From<CommandId> for u32 {
    fn from(id: CommandId) -> u32 {
        id as u32
    }
}

impl TryFrom<u32> for CommandId {
    type Error = Error;
    
    fn try_from(value: u32) -> Result<Self> {
        match value {
            0x0000_0001 => Ok(Self::Init),
            0x0000_0002 => Ok(Self::Idle),
            0x0000_0100 => Ok(Self::FinanceInit),
            0x0000_0101 => Ok(Self::Sale),
            0x0000_0102 => Ok(Self::Refund),
            0x0000_0103 => Ok(Self::SaleV),
            0x0000_0104 => Ok(Self::RefundV),
            0x0000_0105 => Ok(Self::StartOfDay),
            0x0000_0106 => Ok(Self::EndOfDay),
            0x0000_0200 => Ok(Self::HostConnect),
            0x0000_0201 => Ok(Self::HostSend),
            0x0000_0202 => Ok(Self::HostReceive),
            0x0000_0203 => Ok(Self::HostDisconnect),
            0x0000_8200 => Ok(Self::HostConnectResponse),
            0x0000_8201 => Ok(Self::HostSendResponse),
            0x0000_8202 => Ok(Self::HostReceiveResponse),
            0x0000_8203 => Ok(Self::HostDisconnectResponse),
            0x0000_0300 => Ok(Self::Signature),
            0x0000_0301 => Ok(Self::Challenge),
            0x0000_8300 => Ok(Self::SignatureResponse),
            0x0000_8301 => Ok(Self::ChallengeResponse),
            0x0000_0400 => Ok(Self::DebugEnable),
            0x0000_0401 => Ok(Self::DebugDisable),
            0x0000_0402 => Ok(Self::DebugReset),
            0x0000_0403 => Ok(Self::DebugInfo),
            0x0000_0500 => Ok(Self::SetLogLevel),
            0x0000_0501 => Ok(Self::ResetLogInfo),
            0x0000_0502 => Ok(Self::GetLogInfo),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:08X})", self.name(), *self as u32)
    }
}

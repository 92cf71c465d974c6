//! Outbound requests: link management, finance, debug and log controls
//!
//! Each request is a flat variant. Encoding starts a request header, appends
//! the variant's fields and seals the length last.

use bytes::{BufMut, Bytes, BytesMut};
use chrono::{Local, NaiveDateTime};

use heft_types::{CurrencyCode, LogLevel};

use crate::{
    bcd,
    command::CommandId,
    constants::{CURRENCY_CODE_SIZE, INIT_DATE_FORMAT, INIT_DATE_SIZE},
    error::{Error, Result},
    frame::{Frame, FrameBuilder},
    wire::{self, Reader},
};

/// Fields shared by every financial transaction
///
/// ```text
/// ┌───────────────┬─────────────┬──────────────┐
/// │ Currency code │   Amount    │ Card present │
/// │  2 bytes BCD  │  BE u32     │    1 byte    │
/// └───────────────┴─────────────┴──────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinanceRequest {
    pub currency: CurrencyCode,
    
    /// Amount in minor units
    pub amount: u32,
    
    pub card_present: bool,
}

impl FinanceRequest {
    /// Resolve `currency` and bundle the transaction fields
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error if `currency` is neither a known
    /// mnemonic nor a four-digit numeric code.
    pub fn new(currency: &str, amount: u32, card_present: bool) -> Result<Self> {
        Ok(Self {
            currency: CurrencyCode::parse(currency)?,
            amount,
            card_present,
        })
    }
    
    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        let code: [u8; CURRENCY_CODE_SIZE] = bcd::encode_array(self.currency.numeric())?;
        buf.put_slice(&code);
        buf.put_u32(self.amount);
        buf.put_u8(u8::from(self.card_present));
        Ok(())
    }
    
    fn read(reader: &mut Reader<'_>) -> Result<Self> {
        let digits = bcd::decode(reader.read_bytes("currency code", CURRENCY_CODE_SIZE)?)?;
        
        let currency = CurrencyCode::parse(&digits)
            .map_err(|_| Error::ProtocolViolation("currency code is not numeric"))?;
        
        Ok(Self {
            currency,
            amount: reader.read_u32("amount")?,
            card_present: reader.read_u8("card present")? != 0,
        })
    }
}

/// Financial transaction that also names its transaction id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinanceVRequest {
    pub finance: FinanceRequest,
    
    /// Sent behind a one-byte length, so at most 255 bytes
    pub transaction_id: Bytes,
}

impl FinanceVRequest {
    pub fn new(
        currency: &str,
        amount: u32,
        card_present: bool,
        transaction_id: impl AsRef<[u8]>,
    ) -> Result<Self> {
        let transaction_id = transaction_id.as_ref();
        if transaction_id.len() > usize::from(u8::MAX) {
            return Err(Error::InvalidArgument(format!(
                "transaction id is {} bytes, at most {} allowed",
                transaction_id.len(),
                u8::MAX
            )));
        }
        
        Ok(Self {
            finance: FinanceRequest::new(currency, amount, card_present)?,
            transaction_id: Bytes::copy_from_slice(transaction_id),
        })
    }
    
    fn write(&self, buf: &mut BytesMut) -> Result<()> {
        self.finance.write(buf)?;
        wire::put_u8_prefixed(buf, &self.transaction_id)
    }
    
    fn read(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            finance: FinanceRequest::read(reader)?,
            transaction_id: Bytes::copy_from_slice(reader.read_u8_prefixed("transaction id")?),
        })
    }
}

/// Requests sent from the controlling application to the terminal
///
/// # Examples
///
/// ```
/// use heft_core::{CommandId, Request};
///
/// let sale = Request::sale("USD", 12345, true).unwrap();
/// let frame = sale.encode().unwrap();
///
/// assert_eq!(frame.command(), CommandId::Sale);
/// assert_eq!(frame.payload(), &[0x08, 0x40, 0x00, 0x00, 0x30, 0x39, 0x01]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Link initialization stamped with the local time
    Init { timestamp: NaiveDateTime },
    Idle,
    FinanceInit,
    Sale(FinanceRequest),
    Refund(FinanceRequest),
    SaleV(FinanceVRequest),
    RefundV(FinanceVRequest),
    StartOfDay,
    EndOfDay,
    DebugEnable,
    DebugDisable,
    DebugReset,
    DebugInfo,
    SetLogLevel(LogLevel),
    ResetLogInfo,
    GetLogInfo,
}

impl Request {
    /// Init request stamped with the current local time
    pub fn init() -> Self {
        Self::init_at(Local::now().naive_local())
    }
    
    pub fn init_at(timestamp: NaiveDateTime) -> Self {
        Self::Init { timestamp }
    }
    
    pub fn sale(currency: &str, amount: u32, card_present: bool) -> Result<Self> {
        FinanceRequest::new(currency, amount, card_present).map(Self::Sale)
    }
    
    pub fn refund(currency: &str, amount: u32, card_present: bool) -> Result<Self> {
        FinanceRequest::new(currency, amount, card_present).map(Self::Refund)
    }
    
    pub fn sale_v(
        currency: &str,
        amount: u32,
        card_present: bool,
        transaction_id: impl AsRef<[u8]>,
    ) -> Result<Self> {
        FinanceVRequest::new(currency, amount, card_present, transaction_id).map(Self::SaleV)
    }
    
    pub fn refund_v(
        currency: &str,
        amount: u32,
        card_present: bool,
        transaction_id: impl AsRef<[u8]>,
    ) -> Result<Self> {
        FinanceVRequest::new(currency, amount, card_present, transaction_id).map(Self::RefundV)
    }
    
    /// Command id this request is sent under
    pub fn command_id(&self) -> CommandId {
        match self {
            Self::Init { .. } => CommandId::Init,
            Self::Idle => CommandId::Idle,
            Self::FinanceInit => CommandId::FinanceInit,
            Self::Sale(_) => CommandId::Sale,
            Self::Refund(_) => CommandId::Refund,
            Self::SaleV(_) => CommandId::SaleV,
            Self::RefundV(_) => CommandId::RefundV,
            Self::StartOfDay => CommandId::StartOfDay,
            Self::EndOfDay => CommandId::EndOfDay,
            Self::DebugEnable => CommandId::DebugEnable,
            Self::DebugDisable => CommandId::DebugDisable,
            Self::DebugReset => CommandId::DebugReset,
            Self::DebugInfo => CommandId::DebugInfo,
            Self::SetLogLevel(_) => CommandId::SetLogLevel,
            Self::ResetLogInfo => CommandId::ResetLogInfo,
            Self::GetLogInfo => CommandId::GetLogInfo,
        }
    }
    
    /// Encode into a sealed frame
    pub fn encode(&self) -> Result<Frame> {
        let mut builder = FrameBuilder::request(self.command_id());
        let buf = builder.payload_mut();
        
        match self {
            Self::Init { timestamp } => {
                let digits = timestamp.format(INIT_DATE_FORMAT).to_string();
                let packed: [u8; INIT_DATE_SIZE] = bcd::encode_array(&digits)?;
                buf.put_slice(&packed);
            }
            Self::Sale(finance) | Self::Refund(finance) => finance.write(buf)?,
            Self::SaleV(finance) | Self::RefundV(finance) => finance.write(buf)?,
            Self::SetLogLevel(level) => buf.put_u8((*level).into()),
            Self::Idle
            | Self::FinanceInit
            | Self::StartOfDay
            | Self::EndOfDay
            | Self::DebugEnable
            | Self::DebugDisable
            | Self::DebugReset
            | Self::DebugInfo
            | Self::ResetLogInfo
            | Self::GetLogInfo => {}
        }
        
        builder.finish()
    }
    
    /// Parse a request frame back into its typed form
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCommand`] for frames that are not outbound
    /// requests, or a protocol error if the payload is malformed.
    pub fn decode(frame: &Frame) -> Result<Self> {
        let mut reader = Reader::new(frame.payload());
        
        let request = match frame.command() {
            CommandId::Init => {
                let digits = bcd::decode(reader.read_bytes("timestamp", INIT_DATE_SIZE)?)?;
                let timestamp = NaiveDateTime::parse_from_str(&digits, INIT_DATE_FORMAT)
                    .map_err(|_| Error::ProtocolViolation("init timestamp is not a valid date"))?;
                Self::Init { timestamp }
            }
            CommandId::Idle => Self::Idle,
            CommandId::FinanceInit => Self::FinanceInit,
            CommandId::Sale => Self::Sale(FinanceRequest::read(&mut reader)?),
            CommandId::Refund => Self::Refund(FinanceRequest::read(&mut reader)?),
            CommandId::SaleV => Self::SaleV(FinanceVRequest::read(&mut reader)?),
            CommandId::RefundV => Self::RefundV(FinanceVRequest::read(&mut reader)?),
            CommandId::StartOfDay => Self::StartOfDay,
            CommandId::EndOfDay => Self::EndOfDay,
            CommandId::DebugEnable => Self::DebugEnable,
            CommandId::DebugDisable => Self::DebugDisable,
            CommandId::DebugReset => Self::DebugReset,
            CommandId::DebugInfo => Self::DebugInfo,
            CommandId::SetLogLevel => {
                let level = LogLevel::try_from(reader.read_u8("log level")?)
                    .map_err(|_| Error::ProtocolViolation("unknown log level"))?;
                Self::SetLogLevel(level)
            }
            CommandId::ResetLogInfo => Self::ResetLogInfo,
            CommandId::GetLogInfo => Self::GetLogInfo,
            other => return Err(Error::UnknownCommand(other.into())),
        };
        
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::REQUEST_HEADER_SIZE;
    use crate::frame::FrameHeader;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    
    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap()
    }
    
    #[test]
    fn test_sale_layout() {
        let frame = Request::sale("USD", 12345, true).unwrap().encode().unwrap();
        let bytes = frame.as_bytes();
        
        assert_eq!(&bytes[0..4], &u32::from(CommandId::Sale).to_be_bytes());
        assert_eq!(&bytes[4..10], b"000007");
        assert_eq!(bcd::decode(&bytes[10..12]).unwrap(), "0840");
        assert_eq!(&bytes[12..16], &12345u32.to_be_bytes());
        assert_eq!(bytes[16], 1);
        assert_eq!(bytes.len(), 17);
    }
    
    #[test]
    fn test_refund_uses_refund_id() {
        let frame = Request::refund("EUR", 500, false).unwrap().encode().unwrap();
        
        assert_eq!(frame.command(), CommandId::Refund);
        assert_eq!(frame.payload(), &[0x09, 0x78, 0x00, 0x00, 0x01, 0xF4, 0x00]);
    }
    
    #[test]
    fn test_literal_currency() {
        let frame = Request::sale("0352", 1, true).unwrap().encode().unwrap();
        assert_eq!(&frame.payload()[..2], &[0x03, 0x52]);
    }
    
    #[test]
    fn test_invalid_currency() {
        let err = Request::sale("CAD", 100, true).unwrap_err();
        assert!(err.is_invalid_argument());
        
        assert!(Request::refund("08400", 100, true).is_err());
    }
    
    #[test]
    fn test_sale_v_layout() {
        let frame = Request::sale_v("GBP", 250, false, "TX-42").unwrap().encode().unwrap();
        
        assert_eq!(frame.command(), CommandId::SaleV);
        assert_eq!(&frame.as_bytes()[4..10], b"000013");
        assert_eq!(&frame.payload()[7..], b"\x05TX-42");
    }
    
    #[test]
    fn test_refund_v_empty_transaction_id() {
        let frame = Request::refund_v("ISK", 9, true, "").unwrap().encode().unwrap();
        
        assert_eq!(frame.command(), CommandId::RefundV);
        assert_eq!(frame.payload().len(), 8);
        assert_eq!(frame.payload()[7], 0);
    }
    
    #[test]
    fn test_transaction_id_too_long() {
        let id = vec![b'x'; 256];
        let err = Request::sale_v("USD", 1, true, &id).unwrap_err();
        
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
    
    #[test]
    fn test_init_timestamp() {
        let frame = Request::init_at(timestamp()).encode().unwrap();
        
        assert_eq!(&frame.as_bytes()[4..10], b"000007");
        assert_eq!(frame.payload(), &[0x20, 0x24, 0x01, 0x31, 0x23, 0x59, 0x59]);
    }
    
    #[test]
    fn test_init_now_is_fourteen_digits() {
        let frame = Request::init().encode().unwrap();
        let digits = bcd::decode(frame.payload()).unwrap();
        
        assert_eq!(digits.len(), 14);
    }
    
    #[test]
    fn test_empty_requests() {
        let requests = [
            (Request::Idle, CommandId::Idle),
            (Request::FinanceInit, CommandId::FinanceInit),
            (Request::StartOfDay, CommandId::StartOfDay),
            (Request::EndOfDay, CommandId::EndOfDay),
            (Request::DebugEnable, CommandId::DebugEnable),
            (Request::DebugDisable, CommandId::DebugDisable),
            (Request::DebugReset, CommandId::DebugReset),
            (Request::DebugInfo, CommandId::DebugInfo),
            (Request::ResetLogInfo, CommandId::ResetLogInfo),
            (Request::GetLogInfo, CommandId::GetLogInfo),
        ];
        
        for (request, id) in requests {
            let frame = request.encode().unwrap();
            assert_eq!(frame.command(), id);
            assert_eq!(frame.len(), REQUEST_HEADER_SIZE);
            assert_eq!(&frame.as_bytes()[4..10], b"000000");
        }
    }
    
    #[test]
    fn test_set_log_level() {
        let frame = Request::SetLogLevel(LogLevel::Debug).encode().unwrap();
        
        assert_eq!(&frame.as_bytes()[4..10], b"000001");
        assert_eq!(frame.payload(), &[3]);
    }
    
    #[test]
    fn test_length_field_matches_trailing_bytes() {
        let requests = [
            Request::sale("USD", u32::MAX, false).unwrap(),
            Request::sale_v("EUR", 0, true, vec![0xABu8; 255]).unwrap(),
            Request::init_at(timestamp()),
        ];
        
        for request in requests {
            let frame = request.encode().unwrap();
            let header = FrameHeader::parse(frame.as_bytes()).unwrap();
            assert_eq!(header.payload_len, frame.len() - REQUEST_HEADER_SIZE);
        }
    }
    
    #[test]
    fn test_decode_back() {
        let requests = [
            Request::init_at(timestamp()),
            Request::sale("USD", 12345, true).unwrap(),
            Request::refund_v("GBP", 77, false, "abc").unwrap(),
            Request::SetLogLevel(LogLevel::Info),
            Request::EndOfDay,
        ];
        
        for request in requests {
            let frame = request.encode().unwrap();
            assert_eq!(Request::decode(&frame).unwrap(), request);
        }
    }
    
    #[test]
    fn test_decode_truncated_finance() {
        let mut builder = FrameBuilder::request(CommandId::Sale);
        builder.payload_mut().put_slice(&[0x08, 0x40, 0x00]);
        let frame = builder.finish().unwrap();
        
        assert!(matches!(
            Request::decode(&frame),
            Err(Error::Truncated { field: "amount", .. })
        ));
    }
    
    #[test]
    fn test_decode_unknown_log_level() {
        let mut builder = FrameBuilder::request(CommandId::SetLogLevel);
        builder.payload_mut().put_u8(9);
        let frame = builder.finish().unwrap();
        
        let err = Request::decode(&frame).unwrap_err();
        assert!(err.is_protocol_violation());
        assert!(!err.is_invalid_argument());
    }
    
    #[test]
    fn test_decode_currency_not_bcd() {
        let mut builder = FrameBuilder::request(CommandId::Refund);
        builder.payload_mut().put_slice(&[0x0A, 0x24, 0x00, 0x00, 0x00, 0x01, 0x00]);
        let frame = builder.finish().unwrap();
        
        let err = Request::decode(&frame).unwrap_err();
        assert!(matches!(err, Error::InvalidBcdByte { byte: 0x0A, offset: 0 }));
        assert!(err.is_protocol_violation());
        assert!(!err.is_invalid_argument());
    }
    
    #[test]
    fn test_decode_transaction_id_past_end() {
        // Prefix announces ten bytes, three follow
        let mut builder = FrameBuilder::request(CommandId::SaleV);
        builder.payload_mut().put_slice(&[0x08, 0x40, 0x00, 0x00, 0x00, 0x64, 0x01]);
        builder.payload_mut().put_u8(10);
        builder.payload_mut().put_slice(b"TX-");
        let frame = Frame::decode(builder.finish().unwrap().into_bytes()).unwrap();
        
        let err = Request::decode(&frame).unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated { field: "transaction id", needed: 10, remaining: 3 }
        ));
        assert!(err.is_protocol_violation());
    }
    
    #[test]
    fn test_decode_rejects_host_frames() {
        let frame = FrameBuilder::request(CommandId::HostDisconnect).finish().unwrap();
        assert!(matches!(Request::decode(&frame), Err(Error::UnknownCommand(0x0203))));
    }
}

//! Terminal log levels for the SetLogLevel command

use std::fmt;

use crate::error::{Error, Result};

/// Verbosity of the terminal's internal log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LogLevel {
    None = 0,
    Info = 1,
    Full = 2,
    Debug = 3,
}

impl From<LogLevel> for u8 {
    fn from(level: LogLevel) -> u8 {
        level as u8
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Info),
            2 => Ok(Self::Full),
            3 => Ok(Self::Debug),
            _ => Err(Error::Parse(format!("unknown log level: {value}"))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Info => "info",
            Self::Full => "full",
            Self::Debug => "debug",
        };
        f.write_str(name)
    }
}

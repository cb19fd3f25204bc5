use std::net::AddrParseError;

/// A mask length larger than the address family allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("prefix length {len} exceeds {max}")]
pub struct PrefixLenError {
    pub len: u8,
    pub max: u8,
}

/// Why an `address/length` string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CidrError {
    #[error("bad address: {0}")]
    Address(#[from] AddrParseError),

    #[error("bad prefix length {0:?}")]
    MalformedLength(String),

    #[error(transparent)]
    Length(#[from] PrefixLenError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{input:?} is not an IP address: {source}")]
    NotAnAddress {
        input: String,
        #[source]
        source: AddrParseError,
    },

    #[error("{input:?} is not a CIDR: {reason}")]
    NotACidr {
        input: String,
        #[source]
        reason: CidrError,
    },
}

impl ParseError {
    /// The offending input, verbatim.
    pub fn input(&self) -> &str {
        match self {
            Self::NotAnAddress { input, .. } | Self::NotACidr { input, .. } => input,
        }
    }
}

// # Message Model
//
// The minimal view of DHCPv4 and DHCPv6 messages that handlers operate on.
//
// Wire encoding and decoding live in the server front end. Handlers only see
// the transaction identity and the option set, keyed by option code.

use std::collections::BTreeMap;

/// DHCPv4 option codes used by the bundled plugins (RFC 2132)
pub mod option4 {
    /// Router option
    pub const ROUTER: u8 = 3;
    /// Domain Name Server option
    pub const DOMAIN_NAME_SERVER: u8 = 6;
    /// Parameter Request List option
    pub const PARAMETER_REQUEST_LIST: u8 = 55;
}

/// DHCPv6 option codes used by the bundled plugins (RFC 3646)
pub mod option6 {
    /// Option Request option
    pub const ORO: u16 = 6;
    /// DNS Recursive Name Server option
    pub const DNS_SERVERS: u16 = 23;
}

/// A DHCPv4 message as seen by handlers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message4 {
    /// Transaction ID (`xid`)
    pub xid: u32,
    /// Client hardware address (`chaddr`)
    pub client_hw_addr: Vec<u8>,
    options: BTreeMap<u8, Vec<u8>>,
}

impl Message4 {
    /// Create an empty message for the given transaction
    pub fn new(xid: u32, client_hw_addr: impl Into<Vec<u8>>) -> Self {
        Self {
            xid,
            client_hw_addr: client_hw_addr.into(),
            options: BTreeMap::new(),
        }
    }

    /// Build the response skeleton for a request: same transaction, no options
    pub fn reply_to(request: &Message4) -> Self {
        Self::new(request.xid, request.client_hw_addr.clone())
    }

    /// Raw value of an option
    pub fn option(&self, code: u8) -> Option<&[u8]> {
        self.options.get(&code).map(Vec::as_slice)
    }

    /// Set (or replace) an option
    pub fn set_option(&mut self, code: u8, value: impl Into<Vec<u8>>) {
        self.options.insert(code, value.into());
    }

    /// Whether an option is present
    pub fn has_option(&self, code: u8) -> bool {
        self.options.contains_key(&code)
    }

    /// Whether the client listed `code` in its Parameter Request List
    pub fn is_option_requested(&self, code: u8) -> bool {
        self.option(option4::PARAMETER_REQUEST_LIST)
            .is_some_and(|list| list.contains(&code))
    }
}

/// A DHCPv6 message as seen by handlers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message6 {
    /// 24-bit transaction ID
    pub transaction_id: [u8; 3],
    options: BTreeMap<u16, Vec<u8>>,
}

impl Message6 {
    /// Create an empty message for the given transaction
    pub fn new(transaction_id: [u8; 3]) -> Self {
        Self {
            transaction_id,
            options: BTreeMap::new(),
        }
    }

    /// Build the response skeleton for a request
    pub fn reply_to(request: &Message6) -> Self {
        Self::new(request.transaction_id)
    }

    /// Raw value of an option
    pub fn option(&self, code: u16) -> Option<&[u8]> {
        self.options.get(&code).map(Vec::as_slice)
    }

    /// Set (or replace) an option
    pub fn set_option(&mut self, code: u16, value: impl Into<Vec<u8>>) {
        self.options.insert(code, value.into());
    }

    /// Whether an option is present
    pub fn has_option(&self, code: u16) -> bool {
        self.options.contains_key(&code)
    }

    /// Whether the client listed `code` in its Option Request option
    pub fn is_option_requested(&self, code: u16) -> bool {
        self.option(option6::ORO).is_some_and(|oro| {
            oro.chunks_exact(2)
                .any(|pair| u16::from_be_bytes([pair[0], pair[1]]) == code)
        })
    }
}

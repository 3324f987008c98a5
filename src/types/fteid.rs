use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// Fully qualified tunnel endpoint: where a GTP-U tunnel terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fteid {
    pub addr: IpAddr,
    pub teid: u32,
}

impl Fteid {
    pub fn new(addr: IpAddr, teid: u32) -> Self {
        Self { addr, teid }
    }
}

impl fmt::Display for Fteid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:08x}", self.addr, self.teid)
    }
}

pub mod control_uri;

pub use control_uri::*;

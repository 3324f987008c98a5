pub mod api;
pub mod fteid;
pub mod n1n2;

pub use api::*;
pub use fteid::*;
pub use n1n2::*;

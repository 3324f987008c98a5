pub mod establishment;
pub mod handover;
pub mod outbound;
pub mod session_directory;
pub mod teid_pool;

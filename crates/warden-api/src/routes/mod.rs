pub mod log;
pub mod policy;
pub mod whitelist;

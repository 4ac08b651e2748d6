//! Collection handles over the shared engine.

mod log;
mod policy;
mod whitelist;

pub use log::LogCollection;
pub use policy::PolicyCollection;
pub use whitelist::WhitelistCollection;

//! CLI flags.

mod globals;
pub(crate) use globals::GlobalArgs;

mod store;
pub(crate) use store::StoreArgs;

mod oracle;
pub(crate) use oracle::OracleArgs;

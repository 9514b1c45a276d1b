//! Contains subcommands for the tracks node.

mod node;
pub(crate) use node::NodeCommand;

mod check;
pub(crate) use check::CheckCommand;

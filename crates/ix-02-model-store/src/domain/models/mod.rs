//! Projection, history and aggregate entities.

mod aggregate;
mod auction;
mod block;
mod masternode;
mod oracle;
mod poolpair;
mod price;
mod token;

pub use aggregate::*;
pub use auction::*;
pub use block::*;
pub use masternode::*;
pub use oracle::*;
pub use poolpair::*;
pub use price::*;
pub use token::*;

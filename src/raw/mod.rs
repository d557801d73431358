mod arena;
mod handle;
mod node;
mod order;
mod raw_btree;
mod validate;

pub(crate) use order::Order;
pub(crate) use raw_btree::RawBTree;

mod test_server;

pub use test_server::{STUCK_ITEM_TRIGGER, TestServer};

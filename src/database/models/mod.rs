pub mod staff;
pub mod store_access;
pub mod time_slot;

pub use staff::Staff;
pub use store_access::StoreAccessGrant;
pub use time_slot::{TimeSlotItem, TimeSlotTemplate};

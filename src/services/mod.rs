pub mod staff_service;
pub mod store_access_service;
pub mod template_service;

pub use staff_service::{StaffError, StaffService};
pub use store_access_service::{StoreAccessError, StoreAccessService};
pub use template_service::{TemplateError, TemplateService};

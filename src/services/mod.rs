pub mod approval;
pub mod attendance;
pub mod auth;
pub mod geo;
pub mod office_location;
pub mod policy;
pub mod radius_policy;
pub mod summary;

pub use approval::ApprovalWorkflow;
pub use attendance::AttendanceService;
pub use auth::{Actor, Claims};
pub use office_location::OfficeLocationService;
pub use policy::AttendancePolicy;
pub use radius_policy::{RadiusCheck, RadiusPolicy};

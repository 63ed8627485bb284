pub mod approvals;
pub mod attendance;
pub mod office;
pub mod shared;

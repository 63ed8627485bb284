pub mod attendance;
pub mod memory;
pub mod office_location;
pub mod team_directory;

// Re-export all repositories for easy importing
pub use attendance::AttendanceRepository;
pub use memory::{InMemoryAttendanceStore, InMemoryOfficeLocationStore, InMemoryTeamDirectory};
pub use office_location::OfficeLocationRepository;
pub use team_directory::TeamDirectoryRepository;

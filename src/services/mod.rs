pub mod auth_service;
pub mod coverage_service;
pub mod repository_service;
pub mod scan_service;
pub mod security_service;
pub mod sources;
pub mod version_service;

// Re-export commonly used types
pub use auth_service::AuthService;
pub use coverage_service::{CoverageImprovement, CoverageImprovementResult, CoverageService};
pub use repository_service::RepositoryService;
pub use scan_service::ScanService;
pub use security_service::{PullRequestResult, SecurityService};
pub use sources::{
    CoverageSource, DelayWindow, MockCoverageSource, MockUpgradeSource,
    MockVulnerabilitySource, UpgradeSource, VulnerabilitySource,
};
pub use version_service::{DetectedVersion, VersionService};

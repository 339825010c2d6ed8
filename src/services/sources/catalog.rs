//! Fixed, language-keyed candidate tables for the mock scanners.
//!
//! These stand in for a real vulnerability database, version registry and
//! coverage tool. Unknown languages resolve to an empty table (security,
//! version) or the default profile (coverage).

use crate::models::Severity;

#[derive(Debug, Clone, Copy)]
pub struct VulnerabilityCandidate {
    pub id: &'static str,
    pub title: &'static str,
    pub severity: Severity,
    pub cvss: f64,
    pub package: &'static str,
    pub version: &'static str,
    pub fixed_in: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct UpgradeCandidate {
    pub technology: &'static str,
    pub current_version: &'static str,
    pub target_version: &'static str,
    pub priority: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct CoverageProfile {
    pub min_coverage: f64,
    pub max_coverage: f64,
    pub min_tests: i64,
    pub max_tests: i64,
}

const JAVA_VULNERABILITIES: &[VulnerabilityCandidate] = &[
    VulnerabilityCandidate {
        id: "CVE-2024-1001",
        title: "SQL Injection vulnerability in Spring Security",
        severity: Severity::Critical,
        cvss: 9.8,
        package: "spring-security-core",
        version: "5.7.2",
        fixed_in: "6.1.0",
        description: "Authentication bypass through SQL injection in login endpoint",
    },
    VulnerabilityCandidate {
        id: "CVE-2024-1002",
        title: "Deserialization vulnerability in Jackson",
        severity: Severity::High,
        cvss: 8.5,
        package: "jackson-databind",
        version: "2.14.2",
        fixed_in: "2.15.0",
        description: "Remote code execution through unsafe deserialization",
    },
];

const TYPESCRIPT_VULNERABILITIES: &[VulnerabilityCandidate] = &[VulnerabilityCandidate {
    id: "CVE-2024-2001",
    title: "Cross-site scripting in Angular",
    severity: Severity::High,
    cvss: 7.5,
    package: "@angular/common",
    version: "16.0.0",
    fixed_in: "16.2.1",
    description: "XSS vulnerability in user input validation",
}];

const JAVASCRIPT_VULNERABILITIES: &[VulnerabilityCandidate] = &[VulnerabilityCandidate {
    id: "CVE-2024-3001",
    title: "Remote code execution in Node.js",
    severity: Severity::Critical,
    cvss: 9.2,
    package: "node",
    version: "18.0.0",
    fixed_in: "18.17.1",
    description: "RCE through malicious package import",
}];

const PYTHON_VULNERABILITIES: &[VulnerabilityCandidate] = &[VulnerabilityCandidate {
    id: "CVE-2024-4001",
    title: "SQL injection in Django ORM",
    severity: Severity::High,
    cvss: 8.1,
    package: "Django",
    version: "4.1.0",
    fixed_in: "4.2.5",
    description: "SQL injection through raw query parameters",
}];

pub fn vulnerabilities_for(language: &str) -> &'static [VulnerabilityCandidate] {
    match language {
        "Java" => JAVA_VULNERABILITIES,
        "TypeScript" => TYPESCRIPT_VULNERABILITIES,
        "JavaScript" => JAVASCRIPT_VULNERABILITIES,
        "Python" => PYTHON_VULNERABILITIES,
        _ => &[],
    }
}

const JAVA_UPGRADES: &[UpgradeCandidate] = &[
    UpgradeCandidate {
        technology: "Spring Boot",
        current_version: "2.7.0",
        target_version: "3.1.0",
        priority: "high",
    },
    UpgradeCandidate {
        technology: "Java",
        current_version: "17.0.0",
        target_version: "21.0.0",
        priority: "medium",
    },
];

const TYPESCRIPT_UPGRADES: &[UpgradeCandidate] = &[
    UpgradeCandidate {
        technology: "Angular",
        current_version: "16.0.0",
        target_version: "17.0.0",
        priority: "high",
    },
    UpgradeCandidate {
        technology: "TypeScript",
        current_version: "5.0.0",
        target_version: "5.2.0",
        priority: "low",
    },
];

const JAVASCRIPT_UPGRADES: &[UpgradeCandidate] = &[
    UpgradeCandidate {
        technology: "Node.js",
        current_version: "18.0.0",
        target_version: "20.0.0",
        priority: "high",
    },
    UpgradeCandidate {
        technology: "React",
        current_version: "18.2.0",
        target_version: "18.3.0",
        priority: "medium",
    },
];

const PYTHON_UPGRADES: &[UpgradeCandidate] = &[
    UpgradeCandidate {
        technology: "Django",
        current_version: "4.1.0",
        target_version: "4.2.0",
        priority: "high",
    },
    UpgradeCandidate {
        technology: "Python",
        current_version: "3.9.0",
        target_version: "3.11.0",
        priority: "medium",
    },
];

pub fn upgrades_for(language: &str) -> &'static [UpgradeCandidate] {
    match language {
        "Java" => JAVA_UPGRADES,
        "TypeScript" => TYPESCRIPT_UPGRADES,
        "JavaScript" => JAVASCRIPT_UPGRADES,
        "Python" => PYTHON_UPGRADES,
        _ => &[],
    }
}

pub const DEFAULT_COVERAGE_PROFILE: CoverageProfile = CoverageProfile {
    min_coverage: 65.0,
    max_coverage: 85.0,
    min_tests: 70,
    max_tests: 250,
};

pub fn coverage_profile_for(language: &str) -> CoverageProfile {
    match language {
        "Java" => CoverageProfile {
            min_coverage: 70.0,
            max_coverage: 90.0,
            min_tests: 100,
            max_tests: 300,
        },
        "TypeScript" => CoverageProfile {
            min_coverage: 65.0,
            max_coverage: 85.0,
            min_tests: 80,
            max_tests: 250,
        },
        "JavaScript" => CoverageProfile {
            min_coverage: 60.0,
            max_coverage: 80.0,
            min_tests: 60,
            max_tests: 200,
        },
        "Python" => CoverageProfile {
            min_coverage: 75.0,
            max_coverage: 95.0,
            min_tests: 90,
            max_tests: 350,
        },
        _ => DEFAULT_COVERAGE_PROFILE,
    }
}

/// Technology name (lowercased) to mock detected version.
pub fn known_version(technology: &str) -> Option<&'static str> {
    match technology {
        "react" => Some("18.2.0"),
        "typescript" => Some("5.0.0"),
        "node" => Some("18.0.0"),
        "vite" => Some("4.0.0"),
        "tailwindcss" => Some("3.3.0"),
        "java" => Some("17.0.0"),
        "spring-boot" => Some("2.7.0"),
        "python" => Some("3.9.0"),
        "django" => Some("4.1.0"),
        _ => None,
    }
}

pub const SCAN_LANGUAGES: &[&str] = &["Java", "TypeScript", "JavaScript", "Python"];

/// Roots that are never deleted from. Matched as plain string prefixes, so
/// `/optimize` is refused along with `/opt`.
pub const SYSTEM_PATHS: &[&str] = &[
    "/System",
    "/Library/System",
    "/usr",
    "/bin",
    "/sbin",
    "/etc",
    "/var",
    "/private",
    "/Applications",
    "/opt",
];

/// Substrings that mark credentials or keychains anywhere in a path.
pub const PROTECTED_PATTERNS: &[&str] = &[
    ".ssh",
    ".gnupg",
    ".aws",
    ".kube",
    "Keychain",
    "Keychains",
];

/// The only location outside the home directory that may be cleaned.
pub const TEMP_ROOT: &str = "/tmp";

pub const AUDIT_LOG_FILE: &str = ".devsweep.log";

pub const ENV_HOME: &str = "HOME";
pub const ENV_DRY_RUN: &str = "DEVSWEEP_DRY_RUN";
pub const ENV_LOG_FILE: &str = "DEVSWEEP_LOG_FILE";

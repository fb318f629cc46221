pub mod network {
    pub const TIMEOUT_API_REQUEST_MS: u64 = 30_000;
}

pub mod ports {
    pub const ALLOCATION_FLOOR: u16 = 2222;
    pub const MAX_PORT: u16 = 65_535;
}

pub mod ssh {
    pub const WORKSPACE_USER: &str = "brev";
    pub const WORKSPACE_HOSTNAME: &str = "0.0.0.0";
    pub const KEY_IDENTITY_FILE: &str = "IdentityFile";
    pub const KEY_PORT: &str = "Port";
    pub const WILDCARD_PATTERN: &str = "*";
}

pub mod schedule {
    pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 3;
}

pub mod network {
    pub const TIMEOUT_API_REQUEST_MS: u64 = 30_000;
    pub const USER_AGENT: &str = concat!("hub-workflow/", env!("CARGO_PKG_VERSION"));
}

pub mod retry {
    pub const MAX_RETRIES: usize = 3;
    pub const BASE_DELAY_MS: u64 = 1_000;
    pub const STATUS_CODES: &[u16] = &[429, 500, 502, 503, 504];
}

pub mod pagination {
    pub const PAGE_SIZE: usize = 100;
    pub const MAX_PAGES: usize = 1_000;
    pub const PAGE_PARAM: &str = "page";
    pub const SIZE_PARAM: &str = "limit";
}

pub mod auth {
    pub const LOGIN_PATH: &str = "/api/auth/login";
    pub const TOKEN_FIELD: &str = "access_token";
}

pub mod headers {
    pub const JSON: &str = "application/json";
}

pub mod protocols {
    pub const ALLOWED_HTTP: &[&str] = &["http:", "https:"];
}

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const API_URL_ENV: &str = "TEAMMATE_API_URL";

pub const CONFIG_FILE: &str = ".teammate-finder.json";
pub const SESSION_FILE: &str = ".teammate-session.json";

// REST paths, relative to the API base url
pub const UNIVERSITIES_PATH: &str = "/unilist";
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const TEAM_REQUESTS_PATH: &str = "/team/requests";

pub const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this request?";

// Notice texts shown by the auth gateway
pub const MSG_UNIVERSITIES_FAILED: &str = "Failed to load universities!";
pub const MSG_PASSWORD_MISMATCH: &str = "Passwords don't match!";
pub const MSG_REGISTER_OK: &str = "Registration successful! Please log in.";
pub const MSG_REGISTER_NETWORK: &str = "An error occurred during registration!";
pub const MSG_LOGIN_NETWORK: &str = "An error occurred during login!";
pub const MSG_FORGOT_PASSWORD: &str = "Password reset is not available yet. Contact your administrator.";

/// How long a success or info notification stays on screen, in seconds.
pub const NOTIFICATION_TTL_SECS: u64 = 5;

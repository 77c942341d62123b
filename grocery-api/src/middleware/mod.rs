pub mod log_errors;
pub mod rate_limit;

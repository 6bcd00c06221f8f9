use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_COORDINATOR_MAX_ITERATIONS: usize = 5;
pub const DEFAULT_SPECIALIST_MAX_ITERATIONS: usize = 12;
pub const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_ENGINE_MAX_RETRIES: u32 = 3;
pub const MAX_ENGINE_RETRIES: u32 = 10;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    /// Engine credential; `None` leaves the server up but every chat unavailable
    pub openai_api_key: Option<String>,
    pub openai_endpoint: Option<String>,
    pub openai_model: String,
    pub temperature: f32,
    pub coordinator_max_iterations: usize,
    pub specialist_max_iterations: usize,
    pub engine_timeout_secs: u64,
    pub engine_max_retries: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset or blank keys take their
    /// default; malformed or out-of-range numbers are logged and replaced by
    /// the default. Iteration caps must be at least 1.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            port: parse_or(&text, "PORT", DEFAULT_PORT),
            openai_api_key: text("OPENAI_API_KEY"),
            openai_endpoint: text("OPENAI_ENDPOINT"),
            openai_model: text("OPENAI_MODEL")
                .unwrap_or_else(|| crate::ai::openai::DEFAULT_MODEL.to_string()),
            temperature: parse_or(&text, "OPENAI_TEMPERATURE", DEFAULT_TEMPERATURE),
            coordinator_max_iterations: parse_checked(
                &text,
                "COORDINATOR_MAX_ITERATIONS",
                DEFAULT_COORDINATOR_MAX_ITERATIONS,
                |n| *n >= 1,
            ),
            specialist_max_iterations: parse_checked(
                &text,
                "SPECIALIST_MAX_ITERATIONS",
                DEFAULT_SPECIALIST_MAX_ITERATIONS,
                |n| *n >= 1,
            ),
            engine_timeout_secs: parse_or(&text, "ENGINE_TIMEOUT_SECS", DEFAULT_ENGINE_TIMEOUT_SECS),
            engine_max_retries: parse_checked(
                &text,
                "ENGINE_MAX_RETRIES",
                DEFAULT_ENGINE_MAX_RETRIES,
                |n| *n <= MAX_ENGINE_RETRIES,
            ),
        }
    }

    /// Per-call engine timeout; 0 disables it
    pub fn engine_timeout(&self) -> Option<Duration> {
        (self.engine_timeout_secs > 0).then(|| Duration::from_secs(self.engine_timeout_secs))
    }
}

fn parse_or<T, F>(text: &F, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    parse_checked(text, key, default, |_| true)
}

fn parse_checked<T, F, V>(text: &F, key: &str, default: T, valid: V) -> T
where
    T: FromStr + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
    V: Fn(&T) -> bool,
{
    match text(key) {
        Some(raw) => match raw.parse::<T>() {
            Ok(value) if valid(&value) => value,
            _ => {
                log::warn!("{} has invalid value '{}', using default {}", key, raw, default);
                default
            }
        },
        None => default,
    }
}

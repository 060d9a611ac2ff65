use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u64(profile: &str, key: &str, default: u64) -> u64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub aws: AwsConfig,
    pub gemini: GeminiConfig,
    pub retrieval: RetrievalConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `TUTOR_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("TUTOR_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            storage: StorageConfig::from_env_profiled(p),
            aws: AwsConfig::from_env_profiled(p),
            gemini: GeminiConfig::from_env_profiled(p),
            retrieval: RetrievalConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:      {}:{}", self.server.host, self.server.port);
        tracing::info!("  storage:     data_dir={}", self.storage.data_dir.display());
        tracing::info!("  aws:         region={}, bucket={}", self.aws.region, self.aws.s3_bucket.as_deref().unwrap_or("(none)"));
        tracing::info!("  gemini:      model={}, configured={}", self.gemini.model, self.gemini.is_configured());
        tracing::info!(
            "  retrieval:   max_fragments={}, min_fragment_chars={}",
            self.retrieval.max_fragments,
            self.retrieval.min_fragment_chars
        );
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body limit in megabytes (base64 inflates uploads by ~4/3).
    pub max_body_mb: usize,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_u16(p, "PORT", 3001),
            max_body_mb: profiled_env_usize(p, "SERVER_MAX_BODY_MB", 20),
        }
    }
}

// ── Storage ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for the local backend (used when S3 is not configured).
    pub data_dir: PathBuf,
}

impl StorageConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            data_dir: PathBuf::from(profiled_env_or(p, "DATA_DIR", "data")),
        }
    }
}

// ── AWS / S3 ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_prefix: Option<String>,
    pub endpoint_url: Option<String>,
}

impl AwsConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            region: profiled_env_or(p, "AWS_REGION", "us-east-1"),
            access_key_id: profiled_env_opt(p, "AWS_ACCESS_KEY_ID"),
            secret_access_key: profiled_env_opt(p, "AWS_SECRET_ACCESS_KEY"),
            session_token: profiled_env_opt(p, "AWS_SESSION_TOKEN"),
            s3_bucket: profiled_env_opt(p, "S3_BUCKET"),
            s3_prefix: profiled_env_opt(p, "S3_PREFIX"),
            endpoint_url: profiled_env_opt(p, "AWS_ENDPOINT_URL"),
        }
    }

    /// S3 is selected whenever a bucket is named. Credentials may come from
    /// the execution role, so they are not required here.
    pub fn is_configured(&self) -> bool {
        self.s3_bucket.is_some()
    }
}

// ── Gemini ────────────────────────────────────────────────────

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Missing key is a supported state: answers fall back to a fixed notice.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl GeminiConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            api_key: profiled_env_opt(p, "GEMINI_API_KEY"),
            model: profiled_env_or(p, "GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            base_url: profiled_env_or(p, "GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            timeout_secs: profiled_env_u64(p, "GEMINI_TIMEOUT_SECS", 15),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_secs: 15,
        }
    }
}

// ── Retrieval ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub max_fragments: usize,
    /// Fragments must be strictly longer than this many characters.
    pub min_fragment_chars: usize,
}

impl RetrievalConfig {
    fn from_env_profiled(p: &str) -> Self {
        let defaults = Self::default();
        Self {
            max_fragments: profiled_env_usize(p, "RETRIEVAL_MAX_FRAGMENTS", defaults.max_fragments),
            min_fragment_chars: profiled_env_usize(
                p,
                "RETRIEVAL_MIN_FRAGMENT_CHARS",
                defaults.min_fragment_chars,
            ),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_fragments: 5,
            min_fragment_chars: 40,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global; each test uses its own profile prefix.

    #[test]
    fn profiled_key_wins_over_plain_key() {
        env::set_var("TUTORTESTA_GEMINI_MODEL", "gemini-profiled");
        let cfg = Config::for_profile("tutortesta");
        assert_eq!(cfg.profile, "TUTORTESTA");
        assert_eq!(cfg.gemini.model, "gemini-profiled");
        env::remove_var("TUTORTESTA_GEMINI_MODEL");
    }

    #[test]
    fn empty_values_are_treated_as_unset() {
        env::set_var("TUTORTESTB_GEMINI_API_KEY", "");
        assert_eq!(env_opt("TUTORTESTB_GEMINI_API_KEY"), None);
        env::remove_var("TUTORTESTB_GEMINI_API_KEY");
    }

    #[test]
    fn unparseable_numbers_fall_back_to_defaults() {
        env::set_var("TUTORTESTC_RETRIEVAL_MAX_FRAGMENTS", "many");
        env::set_var("TUTORTESTC_GEMINI_TIMEOUT_SECS", "30");
        let cfg = Config::for_profile("TUTORTESTC");
        assert_eq!(cfg.retrieval.max_fragments, 5);
        assert_eq!(cfg.gemini.timeout_secs, 30);
        env::remove_var("TUTORTESTC_RETRIEVAL_MAX_FRAGMENTS");
        env::remove_var("TUTORTESTC_GEMINI_TIMEOUT_SECS");
    }

    #[test]
    fn retrieval_defaults() {
        let r = RetrievalConfig::default();
        assert_eq!(r.max_fragments, 5);
        assert_eq!(r.min_fragment_chars, 40);
    }
}

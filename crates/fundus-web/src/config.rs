use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use jiff::SignedDuration;
use jiff::tz::TimeZone;

/// Where records are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    S3,
    Memory,
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub store: StoreKind,
    pub bucket: String,
    /// JSON fixture for the memory store.
    pub seed_file: Option<PathBuf>,
    pub session_secret: String,
    pub session_ttl: SignedDuration,
    pub cookie_secure: bool,
    /// `0` disables the per-code retry limit.
    pub max_failed_attempts: u32,
    pub lockout_window: SignedDuration,
    pub time_zone: TimeZone,
    /// TrueType font with Japanese glyphs for the PDF report.
    pub font_path: PathBuf,
    pub support_email: Option<String>,
    pub bind_addr: SocketAddr,
    pub image_timeout: Duration,
}

const MIN_SECRET_LEN: usize = 32;

impl WebConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Empty values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> eyre::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = match get("FUNDUS_STORE").as_deref() {
            None | Some("s3") => StoreKind::S3,
            Some("memory") => StoreKind::Memory,
            Some(other) => return Err(eyre::eyre!("FUNDUS_STORE must be s3 or memory, got {other}")),
        };

        let session_secret = get("FUNDUS_SESSION_SECRET")
            .ok_or_else(|| eyre::eyre!("FUNDUS_SESSION_SECRET is required"))?;
        if session_secret.len() < MIN_SECRET_LEN {
            return Err(eyre::eyre!(
                "FUNDUS_SESSION_SECRET must be at least {MIN_SECRET_LEN} bytes"
            ));
        }

        let font_path = get("FUNDUS_FONT_PATH").map(PathBuf::from).ok_or_else(|| {
            eyre::eyre!("FUNDUS_FONT_PATH is required (a TTF with Japanese glyphs, e.g. IPAexGothic)")
        })?;

        let tz_name = get("FUNDUS_TIME_ZONE").unwrap_or_else(|| "Asia/Tokyo".to_string());
        let time_zone = TimeZone::get(&tz_name)
            .map_err(|e| eyre::eyre!("unknown FUNDUS_TIME_ZONE {tz_name}: {e}"))?;

        let bind_addr = get("FUNDUS_BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| eyre::eyre!("invalid FUNDUS_BIND_ADDR: {e}"))?;

        Ok(Self {
            store,
            bucket: get("FUNDUS_BUCKET").unwrap_or_else(|| "fundus-view".to_string()),
            seed_file: get("FUNDUS_SEED_FILE").map(PathBuf::from),
            session_secret,
            session_ttl: SignedDuration::from_mins(parse_number(
                get("FUNDUS_SESSION_TTL_MINUTES"),
                "FUNDUS_SESSION_TTL_MINUTES",
                30,
            )?),
            cookie_secure: parse_bool(get("FUNDUS_COOKIE_SECURE"), "FUNDUS_COOKIE_SECURE", true)?,
            max_failed_attempts: parse_number(
                get("FUNDUS_MAX_FAILED_ATTEMPTS"),
                "FUNDUS_MAX_FAILED_ATTEMPTS",
                5,
            )?,
            lockout_window: SignedDuration::from_mins(parse_number(
                get("FUNDUS_LOCKOUT_MINUTES"),
                "FUNDUS_LOCKOUT_MINUTES",
                15,
            )?),
            time_zone,
            font_path,
            support_email: get("FUNDUS_SUPPORT_EMAIL"),
            bind_addr,
            image_timeout: Duration::from_secs(parse_number(
                get("FUNDUS_IMAGE_TIMEOUT_SECS"),
                "FUNDUS_IMAGE_TIMEOUT_SECS",
                10,
            )?),
        })
    }
}

fn parse_number<T>(raw: Option<String>, key: &str, default: T) -> eyre::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e| eyre::eyre!("invalid {key} ({v}): {e}")),
    }
}

fn parse_bool(raw: Option<String>, key: &str, default: bool) -> eyre::Result<bool> {
    match raw.as_deref().map(str::trim) {
        None => Ok(default),
        Some("1" | "true" | "yes") => Ok(true),
        Some("0" | "false" | "no") => Ok(false),
        Some(other) => Err(eyre::eyre!("invalid {key}: {other}")),
    }
}

use anyhow::Context;
use chrono_tz::Tz;

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: String,
    pub cors_origins: Vec<String>,
    pub timezone: Tz,
    pub closing_hour: u32,
    pub supervisor_phone: String,
    pub forward_url: Option<String>,
    pub session_ttl_minutes: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let supervisor_phone =
            std::env::var("SUPERVISOR_PHONE").context("SUPERVISOR_PHONE must be set")?;
        if supervisor_phone.is_empty() || !supervisor_phone.bytes().all(|b| b.is_ascii_digit()) {
            anyhow::bail!("SUPERVISOR_PHONE must be digits only (country code included, no '+')");
        }

        let closing_hour: u32 = std::env::var("SERVICE_CLOSING_HOUR")
            .unwrap_or_else(|_| "17".into())
            .parse()
            .context("SERVICE_CLOSING_HOUR must be a number")?;
        if !(1..=23).contains(&closing_hour) {
            anyhow::bail!("SERVICE_CLOSING_HOUR must be between 1 and 23");
        }

        let timezone: Tz = std::env::var("SERVICE_TIMEZONE")
            .unwrap_or_else(|_| "America/Sao_Paulo".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("SERVICE_TIMEZONE is not a valid IANA name: {e}"))?;

        Ok(Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            timezone,
            closing_hour,
            supervisor_phone,
            forward_url: std::env::var("FORWARD_URL").ok().filter(|s| !s.is_empty()),
            session_ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .unwrap_or_else(|_| "120".into())
                .parse()
                .context("SESSION_TTL_MINUTES must be a number")?,
        })
    }
}

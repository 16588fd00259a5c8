use humantime::format_duration;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
    time::Duration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodiumDuration {
    duration: Duration,
}

impl CodiumDuration {
    pub fn new(duration: Duration) -> CodiumDuration {
        CodiumDuration { duration }
    }

    pub fn from_secs(secs: u64) -> CodiumDuration {
        CodiumDuration::new(Duration::from_secs(secs))
    }

    pub fn as_human_time_string(&self) -> String {
        format!("{}", format_duration(self.duration))
    }

    pub fn as_secs(&self) -> u64 {
        self.duration.as_secs()
    }

    pub fn get_duration(&self) -> Duration {
        self.duration
    }

    pub fn is_zero(&self) -> bool {
        self.duration.is_zero()
    }

    /// Same duration as a `chrono` delta, saturating at the largest representable value.
    pub fn as_time_delta(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::from_std(self.duration).unwrap_or(chrono::TimeDelta::MAX)
    }
}

impl FromStr for CodiumDuration {
    type Err = humantime::DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = &s.to_lowercase();
        if s == "0" {
            return Ok(CodiumDuration::default());
        }

        Ok(CodiumDuration {
            duration: humantime::parse_duration(s)?,
        })
    }
}

impl Default for CodiumDuration {
    fn default() -> Self {
        CodiumDuration {
            duration: Duration::new(0, 0),
        }
    }
}

impl Display for CodiumDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_human_time_string())
    }
}

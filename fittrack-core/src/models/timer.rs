use serde::{Deserialize, Serialize};
use std::fmt;

/// Preferred rest period between sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RestTimer {
    Short,
    #[default]
    Standard,
    Long,
}

impl RestTimer {
    pub fn seconds(&self) -> u32 {
        match self {
            RestTimer::Short => 60,
            RestTimer::Standard => 75,
            RestTimer::Long => 120,
        }
    }
}

impl TryFrom<u32> for RestTimer {
    type Error = String;

    fn try_from(secs: u32) -> Result<Self, Self::Error> {
        match secs {
            60 => Ok(RestTimer::Short),
            75 => Ok(RestTimer::Standard),
            120 => Ok(RestTimer::Long),
            other => Err(format!(
                "Unsupported rest duration {}s. Valid values: 60, 75, 120",
                other
            )),
        }
    }
}

impl From<RestTimer> for u32 {
    fn from(timer: RestTimer) -> u32 {
        timer.seconds()
    }
}

impl fmt::Display for RestTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.seconds();
        write!(f, "{}:{:02}", secs / 60, secs % 60)
    }
}

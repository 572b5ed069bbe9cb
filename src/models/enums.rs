use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(StomachCondition {
    NoPreference => "no_preference",
    EmptyStomach => "empty",
    FullStomach => "full",
});

str_enum!(AlertChannel {
    SilentNotification => "notification",
    AudibleAlarm => "alarm",
    Both => "both",
});

impl Default for StomachCondition {
    fn default() -> Self {
        Self::NoPreference
    }
}

impl Default for AlertChannel {
    fn default() -> Self {
        Self::SilentNotification
    }
}

impl AlertChannel {
    /// Whether the reminder should ring with the default sound.
    pub fn plays_sound(&self) -> bool {
        matches!(self, Self::AudibleAlarm | Self::Both)
    }
}

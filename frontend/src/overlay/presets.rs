use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::controller::Opacity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Transparent,
    Light,
    Default,
    Dark,
    Opaque,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Transparent,
        Preset::Light,
        Preset::Default,
        Preset::Dark,
        Preset::Opaque,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Transparent => "transparent",
            Preset::Light => "light",
            Preset::Default => "default",
            Preset::Dark => "dark",
            Preset::Opaque => "opaque",
        }
    }

    pub fn opacity(self) -> Opacity {
        let value = match self {
            Preset::Transparent => 10, // video clearly visible
            Preset::Light => 30,
            Preset::Default => 70,
            Preset::Dark => 90,
            Preset::Opaque => 95, // almost fully covered
        };
        Opacity::clamped(value)
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|preset| preset.name()).collect()
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Preset \"{name}\" not found. Available presets: {}", Preset::names().join(", "))]
pub struct PresetError {
    pub name: String,
}

impl FromStr for Preset {
    type Err = PresetError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == name)
            .ok_or_else(|| PresetError {
                name: name.to_string(),
            })
    }
}

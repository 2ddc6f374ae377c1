//! Display preferences — the two persisted presentation settings.

use strum::{Display, EnumString};

/// Background theme choice.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum BgTheme {
  Red,
  Blue,
  #[default]
  Gray,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
  pub dark_mode: bool,
  pub theme:     BgTheme,
}

impl Preferences {
  /// Slot encoding of the dark-mode flag.
  pub fn encode_dark_mode(self) -> &'static str {
    if self.dark_mode { "true" } else { "false" }
  }

  /// Anything other than the literal `"true"` reads as off.
  pub fn decode_dark_mode(raw: &str) -> bool {
    raw == "true"
  }

  /// An unrecognized stored theme falls back to the default.
  pub fn decode_theme(raw: &str) -> BgTheme {
    raw.parse().unwrap_or_default()
  }
}

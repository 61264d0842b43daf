use std::rc::Rc;

use tracing::debug;

use crate::storage::{DARK_MODE_KEY, Storage, USER_NAME_KEY};
use crate::util::parse_bool_flag;

pub const PREFERS_DARK_ENV: &str = "DAYLIST_PREFERS_DARK";

/// Theme and display name, persisted as plain strings.
pub struct Preferences {
    storage: Rc<dyn Storage>,
    dark_mode: bool,
    user_name: Option<String>,
}

impl Preferences {
    /// `prefers_dark` is used only when no theme has been saved yet.
    #[tracing::instrument(skip(storage))]
    pub fn load(storage: Rc<dyn Storage>, prefers_dark: bool) -> anyhow::Result<Self> {
        let stored = storage.load(DARK_MODE_KEY)?;
        let dark_mode = stored
            .as_deref()
            .and_then(parse_bool_flag)
            .unwrap_or(prefers_dark);
        debug!(?stored, dark_mode, "resolved theme");

        let user_name = storage
            .load(USER_NAME_KEY)?
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        Ok(Self {
            storage,
            dark_mode,
            user_name,
        })
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn set_dark_mode(&mut self, dark: bool) -> anyhow::Result<()> {
        self.dark_mode = dark;
        self.storage.save(DARK_MODE_KEY, &dark.to_string())
    }

    pub fn toggle_dark_mode(&mut self) -> anyhow::Result<bool> {
        self.set_dark_mode(!self.dark_mode)?;
        Ok(self.dark_mode)
    }

    /// Saves the trimmed name. A blank name leaves the current one in place.
    pub fn set_user_name(&mut self, name: &str) -> anyhow::Result<bool> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }
        self.storage.save(USER_NAME_KEY, trimmed)?;
        self.user_name = Some(trimmed.to_string());
        Ok(true)
    }
}

/// Reads the environment's dark preference: an explicit override first, then the
/// terminal background hint in `COLORFGBG` ("fg;bg", dark backgrounds are 0-6 and 8).
pub fn system_prefers_dark() -> bool {
    if let Some(flag) = std::env::var(PREFERS_DARK_ENV)
        .ok()
        .as_deref()
        .and_then(parse_bool_flag)
    {
        return flag;
    }

    std::env::var("COLORFGBG")
        .ok()
        .as_deref()
        .and_then(background_is_dark)
        .unwrap_or(false)
}

fn background_is_dark(colorfgbg: &str) -> Option<bool> {
    let bg: u8 = colorfgbg.rsplit(';').next()?.trim().parse().ok()?;
    Some(matches!(bg, 0..=6 | 8))
}

pub fn salutation(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good Morning",
        12..=16 => "Good Afternoon",
        17..=21 => "Good Evening",
        _ => "Good Night",
    }
}

pub fn greeting(hour: u32, name: Option<&str>) -> String {
    match name {
        Some(name) => format!("{}, {name}", salutation(hour)),
        None => salutation(hour).to_string(),
    }
}

//! Account mode guard.

use std::fmt;
use std::str::FromStr;

/// Declared account class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountMode {
    /// Only simulated accounts may trade.
    Demo,
    /// Only real accounts may trade.
    Live,
}

impl FromStr for AccountMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("demo") {
            Ok(AccountMode::Demo)
        } else if s.eq_ignore_ascii_case("live") {
            Ok(AccountMode::Live)
        } else {
            Err(format!("unknown account mode '{}'", s))
        }
    }
}

impl fmt::Display for AccountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountMode::Demo => write!(f, "demo"),
            AccountMode::Live => write!(f, "live"),
        }
    }
}

/// Whether an account is simulated, judged by its name.
///
/// `None` means the account could not be inspected and counts as real.
pub fn is_simulated_account(name: Option<&str>) -> bool {
    name.is_some_and(|n| n.to_lowercase().contains("sim"))
}

/// `demo` requires a simulated account, `live` forbids one. Any other mode
/// string does not restrict activity.
pub fn mode_matches(mode: &str, is_simulated: bool) -> bool {
    match mode.parse::<AccountMode>() {
        Ok(AccountMode::Demo) if !is_simulated => {
            tracing::warn!(account_mode = "demo", "Account is not simulated, blocking entries");
            false
        }
        Ok(AccountMode::Live) if is_simulated => {
            tracing::warn!(account_mode = "live", "Account is simulated, blocking entries");
            false
        }
        _ => true,
    }
}

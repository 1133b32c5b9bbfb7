use crate::core::domain::error::{ProxmoxError, ValidationError};
use std::fmt;

/// A guest identifier accepted as user input for new VMs and containers.
///
/// Valid ids are integers in `[Vmid::MIN, Vmid::MAX]`. Conversion from text
/// or any integer type goes through `TryFrom`, so bad input is rejected
/// before anything is sent to the server.
///
/// # Examples
///
/// ```
/// use pve_manager::Vmid;
///
/// assert_eq!(Vmid::try_from("101").unwrap().get(), 101);
/// assert!(Vmid::try_from(99).is_err());
/// assert!(Vmid::try_from("abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Vmid(u32);

impl Vmid {
    /// Smallest id the server hands out to guests.
    pub const MIN: u32 = 100;
    /// Largest id the server accepts.
    pub const MAX: u32 = 999_999_999;

    /// Returns the numeric id.
    #[must_use]
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Vmid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn out_of_range(value: impl fmt::Display) -> ProxmoxError {
    ValidationError::ConstraintViolation(format!(
        "VM id must be between {} and {} (got {})",
        Vmid::MIN,
        Vmid::MAX,
        value
    ))
    .into()
}

impl TryFrom<i64> for Vmid {
    type Error = ProxmoxError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Vmid::MIN)..=i64::from(Vmid::MAX)).contains(&value) {
            Ok(Self(value as u32))
        } else {
            Err(out_of_range(value))
        }
    }
}

impl TryFrom<u64> for Vmid {
    type Error = ProxmoxError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        i64::try_from(value)
            .map_err(|_| out_of_range(value))
            .and_then(Vmid::try_from)
    }
}

impl TryFrom<i32> for Vmid {
    type Error = ProxmoxError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Vmid::try_from(i64::from(value))
    }
}

impl TryFrom<u32> for Vmid {
    type Error = ProxmoxError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Vmid::try_from(i64::from(value))
    }
}

impl TryFrom<&str> for Vmid {
    type Error = ProxmoxError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let parsed = value.trim().parse::<i64>().map_err(|_| {
            ProxmoxError::from(ValidationError::Format(format!(
                "VM id must be an integer (got '{}')",
                value
            )))
        })?;
        Vmid::try_from(parsed)
    }
}

impl TryFrom<String> for Vmid {
    type Error = ProxmoxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Vmid::try_from(value.as_str())
    }
}

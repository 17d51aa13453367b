use derive_more::Deref;
use uuid::Uuid;

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserID(Uuid);

impl UserID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for UserID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for UserID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Per-user settings that influence validation rules, not stored data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UserPreferences {
    /// Require an explicit added-weight entry for bodyweight exercises.
    pub show_extra_weight: bool,
}

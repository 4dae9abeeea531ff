//! The user whose transactions the app shows.

/// Alias for the type used to identify the owner of a transaction.
pub type UserId = String;

/// The name shown when the user has no display name.
pub const UNKNOWN_USER_NAME: &str = "Unknown user";

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// The owner ID used to filter transactions.
    pub id: UserId,
    /// The name to greet the user with.
    pub name: String,
}

impl CurrentUser {
    /// Create a user, falling back to [UNKNOWN_USER_NAME] when `name` is missing or blank.
    pub fn new(id: &str, name: Option<&str>) -> Self {
        let name = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_USER_NAME);

        Self {
            id: id.to_owned(),
            name: name.to_owned(),
        }
    }
}

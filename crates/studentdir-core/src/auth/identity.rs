use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
}

impl User {
    /// Name shown in front ends: the local part of the email.
    pub fn display_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

pub trait Identity {
    fn current_user(&self) -> Option<&User>;

    /// True while the initial identity check has not completed.
    fn is_loading(&self) -> bool;

    fn is_authenticated(&self) -> bool {
        !self.is_loading() && self.current_user().is_some()
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{Insertable, Table, USERS};

/// A site account. `password` holds a hash produced by the caller; this crate
/// stores it verbatim.
#[derive(Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

impl Insertable for NewUser {
    const TABLE: &'static Table = &USERS;
}

impl NewUser {
    /// Users have no defaulted columns, so the validated shape is stored as is.
    pub fn persist(self, id: i32) -> User {
        User {
            id,
            username: self.username,
            password: self.password,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_password() {
        let user = NewUser {
            username: "admin".into(),
            password: "$argon2id$v=19$secret".into(),
        };
        let rendered = format!("{:?}", user.clone().persist(1));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("secret"));
        assert!(!format!("{user:?}").contains("secret"));
    }

    #[test]
    fn serialized_user_omits_password() {
        let user = User {
            id: 7,
            username: "admin".into(),
            password: "hash".into(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json, serde_json::json!({"id": 7, "username": "admin"}));
    }
}

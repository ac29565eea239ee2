//! Users: the identity every other record points at.
//!
//! There is no password. The email address is the de facto login key but is
//! not unique: registering twice with one address yields two users.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:    Uuid,
  pub name:  String,
  pub email: String,
}

impl User {
  /// Build a user with a freshly generated id.
  pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
    Self {
      id:    Uuid::new_v4(),
      name:  name.into(),
      email: email.into(),
    }
  }
}

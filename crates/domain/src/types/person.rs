//! The person resource served by both the "people" and "user" services

use serde::Serialize;

/// Immutable person record mapped from an upstream response
///
/// Fields are private so a `Person` can only be built through [`Person::new`]
/// and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Person {
    id: i64,
    name: String,
    email: String,
}

impl Person {
    pub fn new(id: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { id, name: name.into(), email: email.into() }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_public_shape() {
        let person = Person::new(7, "Ana", "ana@x.com");
        let json = serde_json::to_value(&person).expect("person serializes");

        assert_eq!(json, serde_json::json!({"id": 7, "name": "Ana", "email": "ana@x.com"}));
    }
}

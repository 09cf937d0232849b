use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Follow entity - a directed subscription from `user_id` to `author_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_id: Uuid,
    pub created: DateTime<Utc>,
}

impl Follow {
    /// Create a follow, rejecting self-subscriptions.
    pub fn new(user_id: Uuid, author_id: Uuid) -> Result<Self, DomainError> {
        if user_id == author_id {
            return Err(DomainError::Validation(
                "A user cannot follow themselves".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            author_id,
            created: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_follow_rejected() {
        let id = Uuid::new_v4();
        assert!(matches!(
            Follow::new(id, id),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_follow_pair() {
        let user = Uuid::new_v4();
        let author = Uuid::new_v4();
        let follow = Follow::new(user, author).unwrap();
        assert_eq!(follow.user_id, user);
        assert_eq!(follow.author_id, author);
    }
}

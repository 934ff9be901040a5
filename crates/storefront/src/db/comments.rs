//! Comment repository.
//!
//! Comments have no identity of their own. Deletes and updates select by field
//! values, so when one user has several comments on the same commodity a
//! single request affects all of them. [`CommentMatch`] names that policy.

use std::str::FromStr;

use bazaar_core::Comment;
use mongodb::bson::{Document, doc};

use super::{DocumentStore, Documents, RepositoryError};

/// Which stored comments a delete request removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentMatch {
    /// Every comment by this user on this commodity, whatever its text.
    #[default]
    AuthorAndCommodity,
    /// Only comments whose username, commodity and text all match.
    ExactComment,
}

impl FromStr for CommentMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "author" => Ok(Self::AuthorAndCommodity),
            "exact" => Ok(Self::ExactComment),
            other => Err(format!("expected 'author' or 'exact', got '{other}'")),
        }
    }
}

/// Repository for the comment collection.
pub struct CommentRepository<'a> {
    docs: Documents<'a, Comment>,
}

impl<'a> CommentRepository<'a> {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore, collection: &'a str) -> Self {
        Self {
            docs: Documents::new(store, collection, "comment"),
        }
    }

    /// All comments on a commodity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the query fails.
    pub async fn for_commodity(&self, commodity: &str) -> Result<Vec<Comment>, RepositoryError> {
        self.docs
            .find_matching(doc! { "commodity": commodity })
            .await
    }

    /// Store a new comment, even if an identical one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the write fails.
    pub async fn insert(&self, comment: &Comment) -> Result<(), RepositoryError> {
        self.docs.insert(comment).await
    }

    /// Delete the comments selected by `policy`. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the delete fails.
    pub async fn delete(
        &self,
        comment: &Comment,
        policy: CommentMatch,
    ) -> Result<u64, RepositoryError> {
        let mut filter = author_filter(comment);
        if policy == CommentMatch::ExactComment {
            filter.insert("comment", comment.comment.as_str());
        }
        self.docs.delete_matching(filter).await
    }

    /// Replace the text of every comment by `comment.username` on
    /// `comment.commodity`. Returns how many matched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the update fails.
    pub async fn update_text(&self, comment: &Comment) -> Result<u64, RepositoryError> {
        self.docs
            .update_matching(author_filter(comment), doc! { "comment": comment.comment.as_str() })
            .await
    }
}

fn author_filter(comment: &Comment) -> Document {
    doc! {
        "username": comment.username.as_str(),
        "commodity": comment.commodity.as_str(),
    }
}

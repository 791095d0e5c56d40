use super::{hydrate, NewsService};
use crate::db::{comment_repo, like_repo};
use crate::error::{NewsError, Result};
use crate::models::{Comment, CommentEdit, CommentInput, Like};
use portal_common::{Profile, StorageError};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

const LIKE_EXISTS: &str = "like already exists";
const NOT_COMMENT_AUTHOR: &str = "only the author can change this comment";

impl From<like_repo::LikeRow> for Like {
    fn from(row: like_repo::LikeRow) -> Self {
        Like {
            id: row.id,
            liker: Profile::reference(row.liker),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<comment_repo::CommentRow> for Comment {
    fn from(row: comment_repo::CommentRow) -> Self {
        Comment {
            id: row.id,
            author: Profile::reference(row.author),
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl NewsService {
    pub async fn get_likes(&self, news_id: Uuid) -> Result<Vec<Like>> {
        let mut likes: Vec<Like> = like_repo::find_active_by_news(&self.pool, news_id)
            .await?
            .into_iter()
            .map(Like::from)
            .collect();

        hydrate::enrich(&mut likes, self.users.as_ref()).await?;
        Ok(likes)
    }

    /// Like a news item. A reader holds at most one active like per item.
    pub async fn create_like(&self, news_id: Uuid, liker: Uuid) -> Result<()> {
        self.ensure_live(news_id).await?;

        let mut tx = self.pool.begin().await?;
        if like_repo::has_active(&mut tx, news_id, liker).await? {
            return Err(NewsError::Duplicate(LIKE_EXISTS.to_string()));
        }

        like_repo::insert(&mut tx, news_id, liker)
            .await
            .map_err(|e| match e {
                StorageError::Duplicate(_) => NewsError::Duplicate(LIKE_EXISTS.to_string()),
                other => other.into(),
            })?;
        tx.commit().await?;

        debug!(news_id = %news_id, liker = %liker, "Like added");
        Ok(())
    }

    pub async fn delete_like(&self, news_id: Uuid, liker: Uuid) -> Result<()> {
        let removed = like_repo::deactivate(&self.pool, news_id, liker).await?;
        if removed == 0 {
            return Err(NewsError::NotFound("like"));
        }

        debug!(news_id = %news_id, liker = %liker, "Like removed");
        Ok(())
    }

    pub async fn get_comments(&self, news_id: Uuid) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = comment_repo::find_by_news(&self.pool, news_id)
            .await?
            .into_iter()
            .map(Comment::from)
            .collect();

        hydrate::enrich(&mut comments, self.users.as_ref()).await?;
        Ok(comments)
    }

    pub async fn create_comment(
        &self,
        news_id: Uuid,
        author: Uuid,
        input: CommentInput,
    ) -> Result<Uuid> {
        input.validate()?;
        self.ensure_live(news_id).await?;

        let id = comment_repo::insert(&self.pool, news_id, author, &input.content).await?;
        debug!(news_id = %news_id, comment_id = %id, "Comment created");
        Ok(id)
    }

    pub async fn edit_comment(&self, news_id: Uuid, author: Uuid, edit: CommentEdit) -> Result<()> {
        edit.validate()?;
        self.check_comment_author(news_id, edit.id, author).await?;

        let updated = comment_repo::update_content(&self.pool, edit.id, author, &edit.content).await?;
        if updated == 0 {
            return Err(NewsError::NotFound("comment"));
        }
        Ok(())
    }

    pub async fn delete_comment(&self, news_id: Uuid, comment_id: Uuid, author: Uuid) -> Result<()> {
        self.check_comment_author(news_id, comment_id, author).await?;

        let deleted = comment_repo::soft_delete(&self.pool, comment_id, author).await?;
        if deleted == 0 {
            return Err(NewsError::NotFound("comment"));
        }
        Ok(())
    }

    async fn check_comment_author(&self, news_id: Uuid, comment_id: Uuid, caller: Uuid) -> Result<()> {
        match comment_repo::find_author(&self.pool, news_id, comment_id).await? {
            None => Err(NewsError::NotFound("comment")),
            Some(author) if author != caller => {
                Err(NewsError::Forbidden(NOT_COMMENT_AUTHOR.to_string()))
            }
            Some(_) => Ok(()),
        }
    }
}

use super::{hydrate, NewsService};
use crate::db::news_repo::{AttachedFiles, NewsRow};
use crate::db::{file_repo, news_repo};
use crate::error::{NewsError, Result};
use crate::models::{
    object_name, File, FileState, News, NewsInput, Page, Upload, CONTENT_BUCKET, PREVIEW_BUCKET,
};
use bytes::Bytes;
use portal_common::Profile;
use s3_utils::detect_mime;
use std::collections::HashMap;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

fn news_from_row(row: NewsRow, files: &HashMap<Uuid, File>) -> Option<News> {
    let Some(content) = files.get(&row.content_id).cloned() else {
        error!(news_id = %row.id, file_id = %row.content_id, "News content file row is missing");
        return None;
    };

    Some(News {
        id: row.id,
        title: row.title,
        description: row.description,
        state: row.state,
        content,
        preview: row.preview_id.and_then(|id| files.get(&id).cloned()),
        author: Profile::reference(row.author),
        user_created: Profile::reference(row.user_created),
        user_updated: Profile::reference(row.user_updated),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl NewsService {
    /// Publish a news item authored by `author`.
    ///
    /// Blobs are uploaded first; if the rows can't be written the uploads
    /// are removed again, and any that can't be removed are left for the
    /// cleanup worker.
    pub async fn create_news(
        &self,
        input: NewsInput,
        content: Upload,
        preview: Option<Upload>,
        author: Uuid,
    ) -> Result<Uuid> {
        input.validate()?;

        let (content, preview) = self.upload_pair(content, preview).await?;
        let result = self
            .insert_news(&input, author, &content, preview.as_ref())
            .await;

        match result {
            Ok(news_id) => {
                info!(news_id = %news_id, author = %author, "News created");
                Ok(news_id)
            }
            Err(e) => {
                self.discard_uploads(&uploaded(&content, preview.as_ref()))
                    .await;
                Err(e)
            }
        }
    }

    async fn insert_news(
        &self,
        input: &NewsInput,
        author: Uuid,
        content: &File,
        preview: Option<&File>,
    ) -> Result<Uuid> {
        let mut tx = self.pool.begin().await?;

        file_repo::insert_files(&mut tx, &uploaded(content, preview)).await?;
        let news_id = news_repo::insert_news(
            &mut tx,
            input,
            author,
            AttachedFiles {
                content_id: content.id,
                preview_id: preview.map(|p| p.id),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(news_id)
    }

    /// Replace the attributes and content of a live news item.
    ///
    /// The previous content file, and the previous preview if a new one
    /// was sent, are detached and left for the cleanup worker.
    pub async fn edit_news(
        &self,
        news_id: Uuid,
        input: NewsInput,
        content: Upload,
        preview: Option<Upload>,
        editor: Uuid,
    ) -> Result<()> {
        input.validate()?;
        self.ensure_live(news_id).await?;

        let (content, preview) = self.upload_pair(content, preview).await?;
        let result = self
            .replace_news(news_id, &input, editor, &content, preview.as_ref())
            .await;

        match result {
            Ok(()) => {
                info!(news_id = %news_id, editor = %editor, "News edited");
                Ok(())
            }
            Err(e) => {
                self.discard_uploads(&uploaded(&content, preview.as_ref()))
                    .await;
                Err(e)
            }
        }
    }

    async fn replace_news(
        &self,
        news_id: Uuid,
        input: &NewsInput,
        editor: Uuid,
        content: &File,
        preview: Option<&File>,
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let current = news_repo::lock_files(&mut tx, news_id)
            .await?
            .ok_or(NewsError::NotFound("news"))?;

        file_repo::insert_files(&mut tx, &uploaded(content, preview)).await?;

        let attached = AttachedFiles {
            content_id: content.id,
            preview_id: preview.map(|p| p.id).or(current.preview_id),
        };
        news_repo::update_news(&mut tx, news_id, input, editor, attached)
            .await
            .map_err(|e| NewsError::storage("news", e))?;

        let mut detached = vec![current.content_id];
        if preview.is_some() {
            detached.extend(current.preview_id);
        }
        file_repo::mark_pending_delete(&mut tx, &detached).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Soft delete a news item and detach its files
    pub async fn delete_news(&self, news_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let files = news_repo::soft_delete(&mut tx, news_id)
            .await?
            .ok_or(NewsError::NotFound("news"))?;
        file_repo::mark_pending_delete(&mut tx, &files.ids()).await?;

        tx.commit().await?;
        info!(news_id = %news_id, "News deleted");
        Ok(())
    }

    pub async fn get_news_list(&self, page: Page) -> Result<Vec<News>> {
        page.validate()?;
        let rows = news_repo::find_page(&self.pool, page.limit, page.offset()).await?;
        self.assemble(rows).await
    }

    pub async fn get_news_by_ids(&self, ids: &[Uuid]) -> Result<Vec<News>> {
        let rows = news_repo::find_by_ids(&self.pool, ids).await?;
        self.assemble(rows).await
    }

    pub async fn get_news(&self, news_id: Uuid) -> Result<News> {
        self.get_news_by_ids(&[news_id])
            .await?
            .into_iter()
            .next()
            .ok_or(NewsError::NotFound("news"))
    }

    /// Bytes of an active file, with its metadata
    pub async fn download_file(&self, file_id: Uuid) -> Result<(File, Bytes)> {
        let file = file_repo::find_active(&self.pool, file_id)
            .await?
            .ok_or(NewsError::NotFound("file"))?;

        let data = self
            .store
            .get_object(&file.bucket_name, &file.file_name)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    warn!(file_id = %file_id, "Active file has no object in storage");
                    NewsError::NotFound("file")
                } else {
                    e.into()
                }
            })?;

        Ok((file, data))
    }

    pub(super) async fn ensure_live(&self, news_id: Uuid) -> Result<()> {
        if news_repo::is_live(&self.pool, news_id).await? {
            Ok(())
        } else {
            Err(NewsError::NotFound("news"))
        }
    }

    /// Attach files and resolve users for a page of rows
    async fn assemble(&self, rows: Vec<NewsRow>) -> Result<Vec<News>> {
        let file_ids: Vec<Uuid> = rows.iter().flat_map(NewsRow::file_ids).collect();
        let files: HashMap<Uuid, File> = file_repo::find_by_ids(&self.pool, &file_ids)
            .await?
            .into_iter()
            .map(|f| (f.id, f))
            .collect();

        let mut news: Vec<News> = rows
            .into_iter()
            .filter_map(|row| news_from_row(row, &files))
            .collect();

        hydrate::enrich(&mut news, self.users.as_ref()).await?;
        Ok(news)
    }

    async fn upload_pair(
        &self,
        content: Upload,
        preview: Option<Upload>,
    ) -> Result<(File, Option<File>)> {
        let content = self.upload(CONTENT_BUCKET, content).await?;

        let preview = match preview {
            Some(preview) => match self.upload(PREVIEW_BUCKET, preview).await {
                Ok(file) => Some(file),
                Err(e) => {
                    self.discard_uploads(&[&content]).await;
                    return Err(e);
                }
            },
            None => None,
        };

        Ok((content, preview))
    }

    async fn upload(&self, bucket: &str, upload: Upload) -> Result<File> {
        let id = Uuid::new_v4();
        let file_name = object_name(id, &upload.filename);
        let mime_type = detect_mime(&upload.filename, upload.content_type.as_deref());

        self.store
            .put_object(bucket, &file_name, upload.data, &mime_type)
            .await?;

        Ok(File {
            id,
            mime_type,
            bucket_name: bucket.to_string(),
            file_name,
            state: FileState::Active,
        })
    }

    /// Best-effort removal of uploads that never got attached
    async fn discard_uploads(&self, files: &[&File]) {
        let mut orphans = Vec::new();
        for file in files {
            match self
                .store
                .remove_object(&file.bucket_name, &file.file_name)
                .await
            {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => {
                    warn!(
                        error = %e,
                        bucket = %file.bucket_name,
                        key = %file.file_name,
                        "Failed to remove unattached upload"
                    );
                    orphans.push(*file);
                }
            }
        }

        if orphans.is_empty() {
            return;
        }

        if let Err(e) = file_repo::insert_orphans(&self.pool, &orphans).await {
            error!(
                error = %e,
                count = orphans.len(),
                "Failed to record unattached uploads for cleanup"
            );
        }
    }
}

fn uploaded<'a>(content: &'a File, preview: Option<&'a File>) -> Vec<&'a File> {
    std::iter::once(content).chain(preview).collect()
}

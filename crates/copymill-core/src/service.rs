//! Generation orchestration.
//!
//! [`ContentService`] wires the pieces together: rows are loaded from
//! the injected store, prompts resolved, the backend called exactly
//! once, the raw response pushed through recovery and normalization,
//! and the row persisted at every state change. A per-row in-flight
//! guard rejects concurrent generation for the same row.

use crate::config::CoreConfig;
use crate::error::CoreError;
use crate::types::{ContentRow, PromptPair, RowId};
use copymill_backend::{
    ContentBackend, ContentKind, ExportClient, GenerationRequest, MetaRequest, MetaResponse,
    PublishRequest, PublishResponse,
};
use copymill_recover::{fallback_title, recover};
use copymill_store::{KeyValueStore, ScopedStore, StoreExt};
use dashmap::DashMap;
use std::sync::Arc;

/// Orchestrates the content row lifecycle over an injected backend and
/// store.
pub struct ContentService {
    backend: Arc<dyn ContentBackend>,
    rows: ScopedStore,
    prompts: ScopedStore,
    meta: ScopedStore,
    config: CoreConfig,
    in_flight: DashMap<RowId, ()>,
}

impl std::fmt::Debug for ContentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ContentService {
    /// Service over `backend` and `store`, namespaced per `config`.
    #[must_use]
    pub fn new(
        backend: Arc<dyn ContentBackend>,
        store: Arc<dyn KeyValueStore>,
        config: CoreConfig,
    ) -> Self {
        Self {
            backend,
            rows: ScopedStore::new(Arc::clone(&store), config.rows_namespace.clone()),
            prompts: ScopedStore::new(Arc::clone(&store), config.prompts_namespace.clone()),
            meta: ScopedStore::new(store, config.meta_namespace.clone()),
            config,
            in_flight: DashMap::new(),
        }
    }

    /// Configuration this service was built with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Create and persist a pending row for `keyword`.
    pub fn create_row(
        &self,
        kind: ContentKind,
        keyword: impl Into<String>,
        job_title: Option<String>,
    ) -> Result<ContentRow, CoreError> {
        let mut row = ContentRow::new(kind, keyword);
        if let Some(title) = job_title {
            row = row.with_job_title(title);
        }
        tracing::info!(id = %row.id(), kind = %row.kind(), keyword = row.keyword(), "creating row");
        self.persist_row(&row)?;
        Ok(row)
    }

    /// Load the row stored under `id`.
    pub fn row(&self, id: RowId) -> Result<ContentRow, CoreError> {
        self.rows
            .get_json(&id.to_string())?
            .ok_or(CoreError::RowNotFound(id))
    }

    /// All rows, oldest first.
    pub fn rows(&self) -> Result<Vec<ContentRow>, CoreError> {
        let mut rows = Vec::new();
        for key in self.rows.keys("")? {
            if let Some(row) = self.rows.get_json::<ContentRow>(&key)? {
                rows.push(row);
            }
        }
        rows.sort_by_key(|row| (row.created_at(), row.id()));
        Ok(rows)
    }

    /// Delete a row along with its prompts and cached meta.
    pub fn delete_row(&self, id: RowId) -> Result<(), CoreError> {
        let row = self.row(id)?;
        tracing::info!(id = %row.id(), keyword = row.keyword(), "deleting row");
        let key = id.to_string();
        self.rows.remove(&key)?;
        self.prompts.remove(&key)?;
        self.meta.remove(&key)?;
        Ok(())
    }

    /// Persist an edited prompt pair for `id`.
    pub fn save_prompts(&self, id: RowId, pair: &PromptPair) -> Result<(), CoreError> {
        self.prompts.set_json(&id.to_string(), pair)?;
        Ok(())
    }

    /// Stored prompt pair for `id`, if the user has edited one.
    pub fn prompts(&self, id: RowId) -> Result<Option<PromptPair>, CoreError> {
        Ok(self.prompts.get_json(&id.to_string())?)
    }

    /// Built-in prompts used when a row has no edited pair.
    #[must_use]
    pub fn default_prompts(kind: ContentKind, keyword: &str, job_title: Option<&str>) -> PromptPair {
        let system = match kind {
            ContentKind::Blog => {
                "You are an expert content writer. Produce long-form blog posts as clean \
                 semantic HTML and respond with JSON containing content, metaSeoTitle and \
                 metaDescription fields."
            }
            ContentKind::Newsletter => {
                "You are an email marketing specialist. Produce engaging newsletter issues \
                 as clean HTML and respond with JSON containing content, metaSeoTitle and \
                 metaDescription fields."
            }
            ContentKind::Competitor => {
                "You are a competitive-intelligence content writer. Produce comparison \
                 articles as clean HTML and respond with JSON containing content, \
                 metaSeoTitle and metaDescription fields."
            }
        };
        let user = match (kind, job_title) {
            (ContentKind::Competitor, Some(title)) => format!(
                "Write a competitor comparison article about \"{keyword}\" aimed at a {title}."
            ),
            (ContentKind::Competitor, None) => {
                format!("Write a competitor comparison article about \"{keyword}\".")
            }
            (ContentKind::Newsletter, _) => {
                format!("Write a newsletter issue about \"{keyword}\".")
            }
            (ContentKind::Blog, _) => {
                format!("Write a comprehensive blog post about \"{keyword}\".")
            }
        };
        PromptPair::new(system, user)
    }

    /// Generate content for `id` with its stored (or default) prompts.
    ///
    /// The backend is called exactly once; on failure the row is marked
    /// `error` and the failure returned. The raw response always yields
    /// content via the recovery parser, so success implies a completed
    /// row with non-empty output and cached meta fields.
    pub async fn generate(
        &self,
        id: RowId,
        brand_kit: Option<serde_json::Value>,
    ) -> Result<ContentRow, CoreError> {
        self.claim(id)?;
        let result = self.run(id, None, brand_kit, false).await;
        self.in_flight.remove(&id);
        result
    }

    /// Regenerate content for `id` with an edited prompt pair, which is
    /// persisted before the call.
    pub async fn regenerate(
        &self,
        id: RowId,
        pair: PromptPair,
        brand_kit: Option<serde_json::Value>,
    ) -> Result<ContentRow, CoreError> {
        self.claim(id)?;
        let result = self.run(id, Some(pair), brand_kit, true).await;
        self.in_flight.remove(&id);
        result
    }

    /// Request fresh meta fields for a completed row, replacing the
    /// cached pair.
    pub async fn generate_meta(&self, id: RowId) -> Result<MetaResponse, CoreError> {
        let row = self.row(id)?;
        if row.output().is_empty() {
            return Err(CoreError::NoOutput(id));
        }
        let meta = self
            .backend
            .generate_meta(&MetaRequest {
                content: row.output().to_string(),
                keyword: row.keyword().to_string(),
            })
            .await?;
        self.meta.set_json(&id.to_string(), &meta)?;
        Ok(meta)
    }

    /// Meta fields cached for `id`, if any.
    pub fn cached_meta(&self, id: RowId) -> Result<Option<MetaResponse>, CoreError> {
        Ok(self.meta.get_json(&id.to_string())?)
    }

    /// Publish a completed row to the CMS, using cached meta when
    /// present and a keyword-derived title otherwise.
    pub async fn publish(
        &self,
        id: RowId,
        status: Option<String>,
    ) -> Result<PublishResponse, CoreError> {
        let row = self.row(id)?;
        if row.output().is_empty() {
            return Err(CoreError::NoOutput(id));
        }
        let meta = self.cached_meta(id)?;
        let title = meta
            .as_ref()
            .map_or_else(|| fallback_title(row.keyword()), |m| m.meta_seo_title.clone());
        tracing::info!(id = %id, %title, "publishing row");
        let response = self
            .backend
            .publish(&PublishRequest {
                title,
                html_content: row.output().to_string(),
                meta_seo_title: meta.as_ref().map(|m| m.meta_seo_title.clone()),
                meta_description: meta.map(|m| m.meta_description),
                status,
            })
            .await?;
        Ok(response)
    }

    /// Export a completed row as a document, returning the shareable
    /// URL.
    pub async fn export_row(
        &self,
        exporter: &ExportClient,
        id: RowId,
    ) -> Result<String, CoreError> {
        let row = self.row(id)?;
        if row.output().is_empty() {
            return Err(CoreError::NoOutput(id));
        }
        let title = self
            .cached_meta(id)?
            .map_or_else(|| fallback_title(row.keyword()), |m| m.meta_seo_title);
        Ok(exporter.export_document(&title, row.output()).await?)
    }

    fn claim(&self, id: RowId) -> Result<(), CoreError> {
        if self.in_flight.insert(id, ()).is_some() {
            tracing::warn!(%id, "rejecting concurrent generation");
            return Err(CoreError::AlreadyRunning(id));
        }
        Ok(())
    }

    async fn run(
        &self,
        id: RowId,
        override_prompts: Option<PromptPair>,
        brand_kit: Option<serde_json::Value>,
        regenerate: bool,
    ) -> Result<ContentRow, CoreError> {
        let mut row = self.row(id)?;
        row.start();
        self.persist_row(&row)?;

        let pair = match override_prompts {
            Some(pair) => {
                self.save_prompts(id, &pair)?;
                pair
            }
            None => match self.prompts(id)? {
                Some(pair) => pair,
                None => Self::default_prompts(row.kind(), row.keyword(), row.job_title()),
            },
        };

        let mut request = GenerationRequest::new(row.keyword(), pair.system, pair.user);
        if let Some(title) = row.job_title() {
            request = request.with_job_title(title);
        }
        if let Some(kit) = brand_kit {
            request = request.with_brand_kit(kit);
        }

        let call = if regenerate {
            self.backend.regenerate(row.kind(), &request)
        } else {
            self.backend.generate(row.kind(), &request)
        };
        let raw = match call.await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(%id, error = %err, "generation failed");
                row.fail(err.to_string());
                self.persist_row(&row)?;
                return Err(err.into());
            }
        };

        let response = recover(&raw, row.keyword());
        row.complete(response.content)?;
        self.persist_row(&row)?;
        self.meta.set_json(
            &id.to_string(),
            &MetaResponse {
                meta_seo_title: response.meta_seo_title,
                meta_description: response.meta_description,
            },
        )?;
        tracing::info!(%id, "row completed");
        Ok(row)
    }

    fn persist_row(&self, row: &ContentRow) -> Result<(), CoreError> {
        self.rows.set_json(&row.id().to_string(), row)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::RowStatus;
    use async_trait::async_trait;
    use copymill_backend::BackendError;
    use copymill_store::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    #[derive(Debug)]
    pub(crate) struct StubBackend {
        raw: String,
        fail: bool,
        generate_calls: AtomicUsize,
        regenerate_calls: AtomicUsize,
    }

    impl StubBackend {
        pub(crate) fn returning(raw: &str) -> Self {
            Self {
                raw: raw.to_string(),
                fail: false,
                generate_calls: AtomicUsize::new(0),
                regenerate_calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                raw: String::new(),
                fail: true,
                generate_calls: AtomicUsize::new(0),
                regenerate_calls: AtomicUsize::new(0),
            }
        }

        fn result(&self) -> Result<String, BackendError> {
            if self.fail {
                Err(BackendError::Api {
                    status: 500,
                    message: "model overloaded".to_string(),
                })
            } else {
                Ok(self.raw.clone())
            }
        }
    }

    #[async_trait]
    impl ContentBackend for StubBackend {
        async fn generate(
            &self,
            _kind: ContentKind,
            _request: &GenerationRequest,
        ) -> Result<String, BackendError> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            self.result()
        }

        async fn regenerate(
            &self,
            _kind: ContentKind,
            _request: &GenerationRequest,
        ) -> Result<String, BackendError> {
            self.regenerate_calls.fetch_add(1, Ordering::SeqCst);
            self.result()
        }

        async fn generate_meta(
            &self,
            request: &MetaRequest,
        ) -> Result<MetaResponse, BackendError> {
            Ok(MetaResponse {
                meta_seo_title: format!("Fresh: {}", request.keyword),
                meta_description: "fresh description".to_string(),
            })
        }

        async fn publish(
            &self,
            request: &PublishRequest,
        ) -> Result<PublishResponse, BackendError> {
            Ok(PublishResponse {
                url: Some(format!("https://cms.example.com/{}", request.title)),
                message: None,
            })
        }
    }

    fn service(backend: Arc<dyn ContentBackend>) -> ContentService {
        ContentService::new(backend, Arc::new(MemoryStore::new()), CoreConfig::default())
    }

    #[tokio::test]
    async fn generate_completes_row_and_caches_meta() {
        let backend = Arc::new(StubBackend::returning(
            r##"{"content":"# Guide\n\nUseful body.","metaSeoTitle":"Guide","metaDescription":"About guides."}"##,
        ));
        let svc = service(Arc::clone(&backend) as Arc<dyn ContentBackend>);
        let row = svc.create_row(ContentKind::Blog, "seo", None).unwrap();

        let row = svc.generate(row.id(), None).await.unwrap();
        assert_eq!(row.status(), RowStatus::Completed);
        assert_eq!(row.output(), "<h1>Guide</h1>\n\n<p>Useful body.</p>");
        assert_eq!(backend.generate_calls.load(Ordering::SeqCst), 1);

        let meta = svc.cached_meta(row.id()).unwrap().unwrap();
        assert_eq!(meta.meta_seo_title, "Guide");
    }

    #[tokio::test]
    async fn backend_failure_marks_row_error_without_retry() {
        let backend = Arc::new(StubBackend::failing());
        let svc = service(Arc::clone(&backend) as Arc<dyn ContentBackend>);
        let row = svc.create_row(ContentKind::Blog, "seo", None).unwrap();

        let err = svc.generate(row.id(), None).await.unwrap_err();
        assert!(matches!(err, CoreError::Backend(_)));
        assert_eq!(backend.generate_calls.load(Ordering::SeqCst), 1);

        let stored = svc.row(row.id()).unwrap();
        assert_eq!(stored.status(), RowStatus::Error);
        assert_eq!(stored.error_message(), Some("backend returned 500: model overloaded"));
    }

    #[tokio::test]
    async fn garbage_response_still_completes_via_recovery() {
        let backend = Arc::new(StubBackend::returning("totally not json, just prose"));
        let svc = service(backend);
        let row = svc.create_row(ContentKind::Newsletter, "q4 recap", None).unwrap();

        let row = svc.generate(row.id(), None).await.unwrap();
        assert_eq!(row.status(), RowStatus::Completed);
        assert!(!row.output().is_empty());
    }

    #[tokio::test]
    async fn regenerate_persists_edited_prompts() {
        let backend = Arc::new(StubBackend::returning(r#"{"content":"<p>v2</p>"}"#));
        let svc = service(Arc::clone(&backend) as Arc<dyn ContentBackend>);
        let row = svc.create_row(ContentKind::Blog, "seo", None).unwrap();

        let edited = PromptPair::new("custom system", "custom user");
        svc.regenerate(row.id(), edited.clone(), None).await.unwrap();

        assert_eq!(backend.regenerate_calls.load(Ordering::SeqCst), 1);
        assert_eq!(svc.prompts(row.id()).unwrap(), Some(edited));
    }

    #[derive(Debug)]
    struct BlockingBackend {
        release: Notify,
    }

    #[async_trait]
    impl ContentBackend for BlockingBackend {
        async fn generate(
            &self,
            _kind: ContentKind,
            _request: &GenerationRequest,
        ) -> Result<String, BackendError> {
            self.release.notified().await;
            Ok(r#"{"content":"<p>slow</p>"}"#.to_string())
        }

        async fn regenerate(
            &self,
            kind: ContentKind,
            request: &GenerationRequest,
        ) -> Result<String, BackendError> {
            self.generate(kind, request).await
        }

        async fn generate_meta(
            &self,
            _request: &MetaRequest,
        ) -> Result<MetaResponse, BackendError> {
            unimplemented!()
        }

        async fn publish(
            &self,
            _request: &PublishRequest,
        ) -> Result<PublishResponse, BackendError> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn concurrent_generation_for_same_row_is_rejected() {
        let backend = Arc::new(BlockingBackend {
            release: Notify::new(),
        });
        let svc = Arc::new(service(Arc::clone(&backend) as Arc<dyn ContentBackend>));
        let row = svc.create_row(ContentKind::Blog, "seo", None).unwrap();
        let id = row.id();

        let first = tokio::spawn({
            let svc = Arc::clone(&svc);
            async move { svc.generate(id, None).await }
        });
        // Let the first call claim the row before trying again.
        tokio::task::yield_now().await;

        let err = svc.generate(id, None).await.unwrap_err();
        assert!(matches!(err, CoreError::AlreadyRunning(_)));

        backend.release.notify_one();
        let row = first.await.unwrap().unwrap();
        assert_eq!(row.status(), RowStatus::Completed);

        // The guard is released once the first call finishes.
        backend.release.notify_one();
        svc.generate(id, None).await.unwrap();
    }

    #[tokio::test]
    async fn generate_meta_requires_output_and_replaces_cache() {
        let backend = Arc::new(StubBackend::returning(r#"{"content":"<p>x</p>"}"#));
        let svc = service(backend);
        let row = svc.create_row(ContentKind::Blog, "seo", None).unwrap();

        let err = svc.generate_meta(row.id()).await.unwrap_err();
        assert!(matches!(err, CoreError::NoOutput(_)));

        svc.generate(row.id(), None).await.unwrap();
        let meta = svc.generate_meta(row.id()).await.unwrap();
        assert_eq!(meta.meta_seo_title, "Fresh: seo");
        assert_eq!(svc.cached_meta(row.id()).unwrap(), Some(meta));
    }

    #[tokio::test]
    async fn publish_uses_cached_meta_title() {
        let backend = Arc::new(StubBackend::returning(
            r#"{"content":"<p>x</p>","metaSeoTitle":"Cached Title","metaDescription":"d"}"#,
        ));
        let svc = service(backend);
        let row = svc.create_row(ContentKind::Blog, "seo", None).unwrap();
        svc.generate(row.id(), None).await.unwrap();

        let resp = svc.publish(row.id(), Some("draft".to_string())).await.unwrap();
        assert_eq!(resp.url.as_deref(), Some("https://cms.example.com/Cached Title"));
    }

    #[tokio::test]
    async fn rows_come_back_oldest_first() {
        let backend = Arc::new(StubBackend::returning("{}"));
        let svc = service(backend);
        let a = svc.create_row(ContentKind::Blog, "first", None).unwrap();
        let b = svc.create_row(ContentKind::Blog, "second", None).unwrap();

        let rows = svc.rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id(), a.id());
        assert_eq!(rows[1].id(), b.id());

        svc.delete_row(a.id()).unwrap();
        assert_eq!(svc.rows().unwrap().len(), 1);
        assert!(matches!(svc.row(a.id()), Err(CoreError::RowNotFound(_))));
    }
}

// market-client/src/portal.rs

//! Portal - the client-side marketplace facade
//!
//! Owns the REST API, the per-resource request slots, the acting session and
//! the state store. Fetches land in the store; search, tag chips and
//! favourites are derived from it on read.

use std::future::Future;

use parking_lot::{RwLock, RwLockReadGuard};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::form::{
    AppForm, EditOptions, TagForm, UpdateOutcome, build_create_payload, build_tag_payload,
    build_update_payload_with,
};
use shared::models::{CatalogEntry, Role, Session, Tag, UserInfo};

use crate::api::MarketplaceApi;
use crate::http::{HttpClient, NetworkHttpClient};
use crate::slots::{RequestSlots, ResourceKind};
use crate::store::{PortalStore, Slice};
use crate::{ClientConfig, ClientError, ClientResult};

pub struct Portal<C: HttpClient> {
    api: MarketplaceApi<C>,
    slots: RequestSlots,
    session: Session,
    options: EditOptions,
    store: RwLock<PortalStore>,
}

impl Portal<NetworkHttpClient> {
    /// Portal over the network client described by `config`
    pub fn connect(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        Ok(Self::new(NetworkHttpClient::new(config)?, session))
    }
}

impl<C: HttpClient> Portal<C> {
    pub fn new(client: C, session: Session) -> Self {
        Self {
            api: MarketplaceApi::new(client),
            slots: RequestSlots::new(),
            session,
            options: EditOptions::default(),
            store: RwLock::new(PortalStore::new()),
        }
    }

    pub fn with_options(mut self, options: EditOptions) -> Self {
        self.options = options;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn api(&self) -> &MarketplaceApi<C> {
        &self.api
    }

    /// Read access to the store; do not hold across an `.await`
    pub fn store(&self) -> RwLockReadGuard<'_, PortalStore> {
        self.store.read()
    }

    /// Drop in-flight fetches, e.g. on sign-out
    pub fn cancel_all(&self) {
        self.slots.cancel_all();
    }

    fn require_admin(&self) -> AppResult<()> {
        if self.session.has_role(Role::Admin) {
            Ok(())
        } else {
            tracing::warn!(user = %self.session.email, "Admin operation rejected");
            Err(AppError::admin_required())
        }
    }

    /// Fetch one resource into its slice
    ///
    /// A superseded fetch returns `RequestCancelled` and leaves the slice to
    /// the newer request.
    async fn load<T, F>(
        &self,
        kind: ResourceKind,
        slice: fn(&mut PortalStore) -> &mut Slice<T>,
        fut: F,
    ) -> AppResult<()>
    where
        F: Future<Output = ClientResult<T>>,
    {
        tracing::debug!(resource = kind.name(), "Fetching");
        slice(&mut self.store.write()).begin(format!("Fetching {}...", kind.name()));

        match self.slots.run(kind, fut).await {
            Ok(data) => {
                slice(&mut self.store.write()).succeed(data, "Successfully fetched");
                Ok(())
            }
            Err(ClientError::Cancelled) => {
                tracing::debug!(resource = kind.name(), "Fetch superseded");
                Err(AppError::cancelled())
            }
            Err(e) => {
                tracing::warn!(resource = kind.name(), error = %e, "Fetch failed");
                let err = AppError::from(e);
                slice(&mut self.store.write()).fail(err.message.clone());
                Err(err)
            }
        }
    }

    /// Run a create/update request, tracking it in `submit_state`
    ///
    /// Writes never go through a request slot: once sent, a mutation is
    /// always awaited to completion.
    async fn submit<T, F>(&self, action: &str, fut: F) -> AppResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        self.store.write().submit_state.begin(format!("{action}..."));
        match fut.await {
            Ok(value) => {
                self.store
                    .write()
                    .submit_state
                    .succeed((), format!("{action} succeeded"));
                Ok(value)
            }
            Err(e) => {
                let err = AppError::from(e);
                tracing::warn!(action, error = %err, "Submission failed");
                self.store.write().submit_state.fail(err.message.clone());
                Err(err)
            }
        }
    }

    // ========== Fetches ==========

    pub async fn refresh_apps(&self) -> AppResult<()> {
        self.load(ResourceKind::Apps, |s| &mut s.apps, self.api.list_apps())
            .await
    }

    pub async fn refresh_user_apps(&self) -> AppResult<()> {
        self.load(
            ResourceKind::UserApps,
            |s| &mut s.user_apps,
            self.api.list_user_apps(),
        )
        .await
    }

    pub async fn refresh_tags(&self) -> AppResult<()> {
        self.load(ResourceKind::Tags, |s| &mut s.tags, self.api.list_tags())
            .await
    }

    pub async fn refresh_groups(&self) -> AppResult<()> {
        self.load(
            ResourceKind::Groups,
            |s| &mut s.groups,
            self.api.list_user_groups(),
        )
        .await
    }

    /// Fetch the signed-in user's profile
    pub async fn load_user(&self) -> AppResult<UserInfo> {
        self.load(ResourceKind::User, |s| &mut s.user, self.api.user_info())
            .await?;
        self.store
            .read()
            .user
            .data
            .clone()
            .ok_or_else(|| AppError::internal("User profile missing after fetch"))
    }

    // ========== Views ==========

    /// Search the user's catalog; see [`shared::catalog::filter_and_sort`]
    pub fn search(&self, query: &str, selected_tag_ids: &[i64]) -> Vec<CatalogEntry> {
        self.store.read().visible_apps(query, selected_tag_ids)
    }

    pub fn available_tags(&self) -> Vec<Tag> {
        self.store.read().available_tags()
    }

    pub fn favourites(&self) -> Vec<CatalogEntry> {
        self.store.read().favourites()
    }

    // ========== Mutations ==========

    /// Flip the favourite flag of a listing; returns the new value
    pub async fn toggle_favourite(&self, id: i64) -> AppResult<bool> {
        let current = self
            .store
            .read()
            .user_apps
            .data
            .as_ref()
            .and_then(|apps| apps.iter().find(|e| e.id == id))
            .map(|e| e.is_favourite)
            .ok_or_else(|| AppError::new(ErrorCode::AppNotFound).with_detail("id", id))?;
        let favourite = !current;

        let result: ClientResult<serde_json::Value> = self
            .slots
            .run(ResourceKind::Favourite, self.api.set_favourite(id, favourite))
            .await;
        if let Err(e) = result {
            let err = AppError::from(e);
            if err.code != ErrorCode::RequestCancelled {
                tracing::warn!(app_id = id, error = %err, "Failed to update favourite");
            }
            return Err(err);
        }

        self.store.write().set_favourite(id, favourite);
        tracing::info!(app_id = id, favourite, "Favourite updated");
        Ok(favourite)
    }

    /// Create a listing; both app lists are refreshed afterwards
    pub async fn create_app(&self, form: &AppForm) -> AppResult<()> {
        self.require_admin()?;
        let payload = build_create_payload(form, &self.session.email)?;

        self.submit("Creating app", self.api.create_app(&payload))
            .await?;
        tracing::info!(name = %payload.name, "App created");

        self.refresh_app_lists().await;
        Ok(())
    }

    /// Send only the changed fields of a listing
    ///
    /// An edit without changes is rejected with `NoChanges` before any
    /// request is made.
    pub async fn update_app(&self, id: i64, form: &AppForm) -> AppResult<()> {
        self.require_admin()?;
        form.validate_for_update()?;

        let original = self
            .store
            .read()
            .find_app(id)
            .cloned()
            .ok_or_else(|| AppError::new(ErrorCode::AppNotFound).with_detail("id", id))?;

        let outcome =
            build_update_payload_with(&original, form, &self.session.email, &self.options)?;
        let patch = match outcome {
            UpdateOutcome::Patch(patch) => patch,
            UpdateOutcome::NoChange => {
                tracing::debug!(app_id = id, "Update skipped, no changes");
                return Err(AppError::no_changes("name"));
            }
        };

        self.submit("Updating app", self.api.update_app(id, &patch))
            .await?;
        tracing::info!(app_id = id, fields = ?patch.changed_fields(), "App updated");

        self.refresh_app_lists().await;
        Ok(())
    }

    /// Create a tag; the tag list is refreshed afterwards
    pub async fn create_tag(&self, form: &TagForm) -> AppResult<()> {
        self.require_admin()?;
        {
            let store = self.store.read();
            let existing = store.tags.data.as_deref().unwrap_or_default();
            form.check_unique(existing)?;
        }
        let payload = build_tag_payload(form, &self.session.email)?;

        self.submit("Creating tag", self.api.create_tag(&payload))
            .await?;
        tracing::info!(name = %payload.name, "Tag created");

        self.refresh_after_mutation(self.refresh_tags()).await;
        Ok(())
    }

    /// Reload the admin catalog and the user's catalog together
    async fn refresh_app_lists(&self) {
        tokio::join!(
            self.refresh_after_mutation(self.refresh_apps()),
            self.refresh_after_mutation(self.refresh_user_apps()),
        );
    }

    /// The mutation already succeeded; a failed refresh only leaves the list stale
    async fn refresh_after_mutation(&self, refresh: impl Future<Output = AppResult<()>>) {
        if let Err(e) = refresh.await {
            if e.code != ErrorCode::RequestCancelled {
                tracing::warn!(error = %e, "Refresh after mutation failed");
            }
        }
    }
}

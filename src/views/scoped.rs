//! Scoped list pattern shared by every resource screen.
//!
//! A [`ScopedList`] holds the rows of one resource for one scope (usually a
//! case id). Fetching is always a full re-fetch; every successful mutation is
//! followed by a reload of the same scope.
//!
//! ```text
//! NoSelection --select(Some)--> Loading --ok--> Loaded
//!                                  |              |
//!                                  +----err----> Error (rows cleared)
//! any state --select(other)--> Loading
//! Loaded --create/update/delete ok--> Loading
//! ```

use super::confirm::Confirm;
use crate::types::{AppError, Result};
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, error, warn};

/// A backend resource that can be listed under a scope and mutated.
#[async_trait]
pub trait ScopedResource: Send + Sync {
    /// Key the rows are fetched under.
    type Scope: Copy + PartialEq + fmt::Debug + Send + Sync;
    type Row: Clone + Send + Sync;
    /// Creation form.
    type Draft: Send + Sync;
    /// Update form.
    type Patch: Send + Sync;

    /// Singular noun used in banners and prompts.
    const NAME: &'static str;

    fn row_id(row: &Self::Row) -> Option<i64>;

    async fn fetch(&self, scope: Self::Scope) -> Result<Vec<Self::Row>>;

    async fn create(&self, scope: Self::Scope, draft: &Self::Draft) -> Result<Self::Row>;

    async fn update(&self, id: i64, patch: &Self::Patch) -> Result<Self::Row>;

    async fn delete(&self, id: i64) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Nothing selected, nothing fetched.
    NoSelection,
    Loading,
    Loaded,
    /// The last fetch failed; carries the banner text.
    Error(String),
}

pub struct ScopedList<R: ScopedResource> {
    resource: R,
    scope: Option<R::Scope>,
    state: ViewState,
    rows: Vec<R::Row>,
    banner: Option<String>,
    error: Option<AppError>,
}

impl<R: ScopedResource> ScopedList<R> {
    pub fn new(resource: R) -> Self {
        Self {
            resource,
            scope: None,
            state: ViewState::NoSelection,
            rows: Vec::new(),
            banner: None,
            error: None,
        }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn scope(&self) -> Option<R::Scope> {
        self.scope
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn rows(&self) -> &[R::Row] {
        &self.rows
    }

    /// Error banner from the last failed fetch or mutation.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// The error behind the last failed fetch, handed out once.
    pub fn take_error(&mut self) -> Option<AppError> {
        self.error.take()
    }

    pub fn find(&self, id: i64) -> Option<&R::Row> {
        self.rows.iter().find(|row| R::row_id(row) == Some(id))
    }

    /// Change the scope. `None` returns to `NoSelection`; any scope, even the
    /// current one, restarts loading.
    pub async fn select(&mut self, scope: Option<R::Scope>) {
        self.scope = scope;
        self.banner = None;
        match scope {
            Some(_) => self.reload().await,
            None => {
                self.rows.clear();
                self.state = ViewState::NoSelection;
            }
        }
    }

    /// Re-fetch the rows of the current scope.
    pub async fn reload(&mut self) {
        let Some(scope) = self.scope else {
            self.state = ViewState::NoSelection;
            return;
        };

        self.state = ViewState::Loading;
        debug!(resource = R::NAME, ?scope, "Loading rows");

        match self.resource.fetch(scope).await {
            Ok(rows) => {
                self.rows = rows;
                self.error = None;
                self.state = ViewState::Loaded;
            }
            Err(e) => {
                error!(resource = R::NAME, ?scope, "Failed to load rows: {}", e);
                let banner = e.banner(&format!("load {}s", R::NAME));
                self.rows.clear();
                self.banner = Some(banner.clone());
                self.error = Some(e);
                self.state = ViewState::Error(banner);
            }
        }
    }

    fn require_scope(&mut self) -> Result<R::Scope> {
        match self.scope {
            Some(scope) => Ok(scope),
            None => {
                let err = AppError::Validation("Please select a case first".to_string());
                self.banner = Some(err.banner(""));
                Err(err)
            }
        }
    }

    fn fail<T>(&mut self, action: &str, err: AppError) -> Result<T> {
        warn!(resource = R::NAME, "Failed to {}: {}", action, err);
        self.banner = Some(err.banner(&format!("{} {}", action, R::NAME)));
        Err(err)
    }

    pub async fn create(&mut self, draft: &R::Draft) -> Result<R::Row> {
        let scope = self.require_scope()?;
        self.banner = None;
        match self.resource.create(scope, draft).await {
            Ok(row) => {
                self.reload().await;
                Ok(row)
            }
            Err(e) => self.fail("create", e),
        }
    }

    pub async fn update(&mut self, id: i64, patch: &R::Patch) -> Result<R::Row> {
        self.banner = None;
        match self.resource.update(id, patch).await {
            Ok(row) => {
                self.reload().await;
                Ok(row)
            }
            Err(e) => self.fail("update", e),
        }
    }

    /// Delete after asking `confirm`. Returns `Ok(false)` when declined, in
    /// which case no request is issued and the rows are untouched.
    pub async fn delete(&mut self, id: i64, confirm: &dyn Confirm) -> Result<bool> {
        let prompt = format!("Are you sure you want to delete this {} (#{})?", R::NAME, id);
        if !confirm.confirm(&prompt) {
            debug!(resource = R::NAME, id, "Delete declined");
            return Ok(false);
        }

        self.banner = None;
        match self.resource.delete(id).await {
            Ok(()) => {
                self.reload().await;
                Ok(true)
            }
            Err(e) => self.fail("delete", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::confirm::{AlwaysConfirm, NeverConfirm};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeStore {
        rows: Mutex<Vec<(i64, u32, String)>>,
        fail_fetch: Mutex<bool>,
        deletes: Mutex<u32>,
    }

    #[derive(Clone, Default)]
    struct FakeResource(Arc<FakeStore>);

    #[async_trait]
    impl ScopedResource for FakeResource {
        type Scope = u32;
        type Row = (i64, u32, String);
        type Draft = String;
        type Patch = String;

        const NAME: &'static str = "note";

        fn row_id(row: &Self::Row) -> Option<i64> {
            Some(row.0)
        }

        async fn fetch(&self, scope: u32) -> Result<Vec<Self::Row>> {
            if *self.0.fail_fetch.lock() {
                return Err(AppError::Network("connection refused".to_string()));
            }
            Ok(self
                .0
                .rows
                .lock()
                .iter()
                .filter(|r| r.1 == scope)
                .cloned()
                .collect())
        }

        async fn create(&self, scope: u32, draft: &String) -> Result<Self::Row> {
            if draft.is_empty() {
                return Err(AppError::Validation("text is required".to_string()));
            }
            let mut rows = self.0.rows.lock();
            let row = (rows.len() as i64 + 1, scope, draft.clone());
            rows.push(row.clone());
            Ok(row)
        }

        async fn update(&self, id: i64, patch: &String) -> Result<Self::Row> {
            let mut rows = self.0.rows.lock();
            let row = rows
                .iter_mut()
                .find(|r| r.0 == id)
                .ok_or_else(|| AppError::NotFound(format!("note {}", id)))?;
            row.2 = patch.clone();
            Ok(row.clone())
        }

        async fn delete(&self, id: i64) -> Result<()> {
            *self.0.deletes.lock() += 1;
            self.0.rows.lock().retain(|r| r.0 != id);
            Ok(())
        }
    }

    fn seeded() -> FakeResource {
        let resource = FakeResource::default();
        *resource.0.rows.lock() = vec![
            (1, 7, "first".to_string()),
            (2, 7, "second".to_string()),
            (3, 8, "other case".to_string()),
        ];
        resource
    }

    #[tokio::test]
    async fn test_starts_without_selection() {
        let list = ScopedList::new(seeded());
        assert_eq!(list.state(), &ViewState::NoSelection);
        assert!(list.rows().is_empty());
    }

    #[tokio::test]
    async fn test_select_loads_scoped_rows() {
        let mut list = ScopedList::new(seeded());
        list.select(Some(7)).await;

        assert_eq!(list.state(), &ViewState::Loaded);
        assert_eq!(list.rows().len(), 2);

        list.select(Some(8)).await;
        assert_eq!(list.rows().len(), 1);

        list.select(None).await;
        assert_eq!(list.state(), &ViewState::NoSelection);
        assert!(list.rows().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_clears_rows() {
        let resource = seeded();
        let mut list = ScopedList::new(resource.clone());
        list.select(Some(7)).await;
        assert_eq!(list.rows().len(), 2);

        *resource.0.fail_fetch.lock() = true;
        list.reload().await;

        assert_eq!(
            list.state(),
            &ViewState::Error("Error while trying to load notes".to_string())
        );
        assert!(list.rows().is_empty());
        assert!(list.take_error().is_some());
        assert!(list.take_error().is_none());
    }

    #[tokio::test]
    async fn test_create_reloads() {
        let mut list = ScopedList::new(seeded());
        list.select(Some(7)).await;

        let row = list.create(&"third".to_string()).await.expect("create");
        assert_eq!(row.1, 7);
        assert_eq!(list.rows().len(), 3);
        assert_eq!(list.state(), &ViewState::Loaded);
    }

    #[tokio::test]
    async fn test_create_without_selection_is_rejected() {
        let mut list = ScopedList::new(seeded());
        let result = list.create(&"orphan".to_string()).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(list.banner(), Some("Please select a case first"));
    }

    #[tokio::test]
    async fn test_mutation_failure_keeps_rows() {
        let mut list = ScopedList::new(seeded());
        list.select(Some(7)).await;

        let result = list.update(99, &"missing".to_string()).await;
        assert!(result.is_err());
        assert_eq!(list.rows().len(), 2);
        assert_eq!(list.banner(), Some("Error while trying to update note"));

        let result = list.create(&String::new()).await;
        assert!(result.is_err());
        assert_eq!(list.banner(), Some("text is required"));
    }

    #[tokio::test]
    async fn test_declined_delete_issues_nothing() {
        let resource = seeded();
        let mut list = ScopedList::new(resource.clone());
        list.select(Some(7)).await;

        let deleted = list.delete(1, &NeverConfirm).await.expect("delete");
        assert!(!deleted);
        assert_eq!(*resource.0.deletes.lock(), 0);
        assert_eq!(list.rows().len(), 2);

        let deleted = list.delete(1, &AlwaysConfirm).await.expect("delete");
        assert!(deleted);
        assert_eq!(*resource.0.deletes.lock(), 1);
        assert_eq!(list.rows().len(), 1);
        assert!(list.find(1).is_none());
    }
}

//! One resource page: the cached collection, its filter, and reloads.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use tallerpro_auth::SessionStore;
use tallerpro_client::{ApiError, Endpoint, Operation, ResourceClient, user_message};
use tallerpro_core::Entity;
use tallerpro_workshop::matches_term;

use crate::seams::{Confirmation, ReloadTarget};

/// Why the collection could not be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFailure {
    pub error: ApiError,
    /// What the page displays.
    pub message: String,
    /// The list endpoint itself is missing; the page is degraded, not broken.
    pub unavailable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    Idle,
    Loading,
    Loaded(Vec<T>),
    Failed(ListFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; nothing was sent.
    Cancelled,
    Deleted,
    /// The collection is left as displayed; `0` is the message to show.
    Failed(String),
}

struct PageInner<T> {
    state: ListState<T>,
    /// Ticket of the most recently dispatched reload.
    latest: u64,
    mounted: bool,
    notice: Option<String>,
}

/// Owns the in-memory copy of one resource collection.
///
/// The collection is never patched locally: every mutation ends in a full
/// reload. Reloads are numbered, and a response is applied only if it
/// belongs to the most recent one.
pub struct ListPageController<C: ResourceClient> {
    client: Arc<C>,
    session: Option<SessionStore>,
    endpoint: Endpoint,
    inner: Mutex<PageInner<C::Record>>,
}

impl<C: ResourceClient> ListPageController<C> {
    pub fn new(client: Arc<C>) -> Self {
        let endpoint = Endpoint::new(client.resource(), Operation::List);
        Self {
            client,
            session: None,
            endpoint,
            inner: Mutex::new(PageInner {
                state: ListState::Idle,
                latest: 0,
                mounted: false,
                notice: None,
            }),
        }
    }

    /// Drop `session` whenever the backend rejects its credential.
    pub fn with_session(mut self, session: SessionStore) -> Self {
        self.session = Some(session);
        self
    }

    fn lock(&self) -> MutexGuard<'_, PageInner<C::Record>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ListState<C::Record> {
        self.lock().state.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.lock().mounted
    }

    /// Error from the last failed delete, if it has not been superseded.
    pub fn notice(&self) -> Option<String> {
        self.lock().notice.clone()
    }

    /// The loaded collection, or nothing when not `Loaded`.
    pub fn records(&self) -> Vec<C::Record> {
        match &self.lock().state {
            ListState::Loaded(records) => records.clone(),
            _ => Vec::new(),
        }
    }

    /// Case-insensitive substring match over the record's display fields.
    /// An empty term returns the whole collection in order.
    pub fn filter(&self, term: &str) -> Vec<C::Record> {
        self.filter_where(term, |_| true)
    }

    /// `filter` composed with an extra facet (e.g. technician status).
    pub fn filter_where<P>(&self, term: &str, facet: P) -> Vec<C::Record>
    where
        P: Fn(&C::Record) -> bool,
    {
        match &self.lock().state {
            ListState::Loaded(records) => records
                .iter()
                .filter(|record| matches_term(*record, term) && facet(*record))
                .cloned()
                .collect(),
            _ => Vec::new(),
        }
    }

    pub async fn mount(&self) {
        self.lock().mounted = true;
        tracing::debug!(resource = %self.endpoint.resource, "page mounted");
        self.request_reload().await;
    }

    /// Stop applying responses. In-flight requests are left to finish.
    pub fn unmount(&self) {
        let mut inner = self.lock();
        inner.mounted = false;
        inner.state = ListState::Idle;
        inner.notice = None;
    }

    /// Enter `Loading` and re-fetch. A newer reload supersedes this one.
    pub async fn request_reload(&self) {
        let ticket = {
            let mut inner = self.lock();
            if !inner.mounted {
                tracing::debug!(resource = %self.endpoint.resource, "reload skipped: page not mounted");
                return;
            }
            inner.latest += 1;
            inner.state = ListState::Loading;
            inner.latest
        };

        let result = self.client.list().await;
        self.apply(ticket, result).await;
    }

    async fn apply(&self, ticket: u64, result: Result<Vec<C::Record>, ApiError>) {
        if let Err(err) = &result {
            self.invalidate_if_rejected(err).await;
        }

        let mut inner = self.lock();
        if !inner.mounted {
            tracing::debug!(resource = %self.endpoint.resource, ticket, "dropping response for unmounted page");
            return;
        }
        if ticket != inner.latest {
            tracing::warn!(
                resource = %self.endpoint.resource,
                ticket,
                latest = inner.latest,
                "discarding stale list response"
            );
            return;
        }

        inner.state = match result {
            Ok(records) => {
                tracing::info!(resource = %self.endpoint.resource, count = records.len(), "list loaded");
                ListState::Loaded(records)
            }
            Err(error) => {
                let message = user_message(&error, self.endpoint);
                let unavailable =
                    self.endpoint.is_optional() && matches!(error, ApiError::NotFound(_));
                tracing::warn!(resource = %self.endpoint.resource, unavailable, "list failed: {error}");
                ListState::Failed(ListFailure {
                    error,
                    message,
                    unavailable,
                })
            }
        };
    }

    async fn invalidate_if_rejected(&self, err: &ApiError) {
        if !err.is_unauthorized() {
            return;
        }
        if let Some(session) = &self.session {
            session.invalidate("backend rejected the session credential").await;
        }
    }

    /// Delete one record after the user confirms, then reload.
    pub async fn delete(
        &self,
        id: <C::Record as Entity>::Id,
        confirmation: &dyn Confirmation,
    ) -> DeleteOutcome {
        let prompt = format!("Delete {} {id}?", self.endpoint.resource);
        if !confirmation.confirm(&prompt).await {
            return DeleteOutcome::Cancelled;
        }

        match self.client.delete(id).await {
            Ok(()) => {
                tracing::info!(resource = %self.endpoint.resource, %id, "record deleted");
                self.lock().notice = None;
                self.request_reload().await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                self.invalidate_if_rejected(&err).await;
                let endpoint = Endpoint::new(self.endpoint.resource, Operation::Delete);
                let message = user_message(&err, endpoint);
                tracing::warn!(resource = %self.endpoint.resource, %id, "delete failed: {err}");
                self.lock().notice = Some(message.clone());
                DeleteOutcome::Failed(message)
            }
        }
    }
}

#[async_trait]
impl<C: ResourceClient + 'static> ReloadTarget for ListPageController<C> {
    async fn request_reload(&self) {
        ListPageController::request_reload(self).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seams::Preconfirmed;
    use crate::testing::{FakeVehicles, signed_in_session, until, vehicle};
    use proptest::prelude::*;
    use tallerpro_auth::AuthError;
    use tallerpro_client::Resource;
    use tallerpro_client::messages::{FORBIDDEN, ORDERS_LIST_UNAVAILABLE};
    use tallerpro_core::VehicleId;
    use tallerpro_workshop::Vehicle;

    fn fleet() -> Vec<Vehicle> {
        vec![vehicle(1, "ABC123", "Toyota"), vehicle(2, "XYZ999", "Ford")]
    }

    #[tokio::test]
    async fn mount_loads_the_collection() {
        let page = ListPageController::new(Arc::new(FakeVehicles::new().then_list(Ok(fleet()))));
        assert_eq!(page.state(), ListState::Idle);

        page.mount().await;
        assert_eq!(page.state(), ListState::Loaded(fleet()));
    }

    #[tokio::test]
    async fn reload_before_mount_is_ignored() {
        let client = Arc::new(FakeVehicles::new());
        let page = ListPageController::new(client.clone());
        page.request_reload().await;
        assert_eq!(client.lists(), 0);
        assert_eq!(page.state(), ListState::Idle);
    }

    #[tokio::test]
    async fn late_response_from_an_older_reload_is_discarded() {
        let client = Arc::new(FakeVehicles::new().then_list(Ok(Vec::new())));
        let page = Arc::new(ListPageController::new(client.clone()));
        page.mount().await;

        let release_a = client.then_list_gated(Ok(vec![vehicle(1, "AAA111", "Seat")]));
        client.queue_list(Ok(fleet()));
        let reload_a = {
            let page = page.clone();
            tokio::spawn(async move { page.request_reload().await })
        };
        until(|| client.lists() == 2).await;
        assert_eq!(page.state(), ListState::Loading);

        page.request_reload().await;
        assert_eq!(page.records(), fleet());

        release_a.send(()).unwrap();
        reload_a.await.unwrap();
        assert_eq!(page.records(), fleet());
    }

    #[tokio::test]
    async fn response_after_unmount_is_not_applied() {
        let client = Arc::new(FakeVehicles::new().then_list(Ok(Vec::new())));
        let page = Arc::new(ListPageController::new(client.clone()));
        page.mount().await;

        let release = client.then_list_gated(Ok(fleet()));
        let reload = {
            let page = page.clone();
            tokio::spawn(async move { page.request_reload().await })
        };
        until(|| client.lists() == 2).await;

        page.unmount();
        release.send(()).unwrap();
        reload.await.unwrap();
        assert_eq!(page.state(), ListState::Idle);
    }

    #[tokio::test]
    async fn failure_is_retained_without_retry() {
        let client = Arc::new(FakeVehicles::new().then_list(Err(ApiError::Network("refused".into()))));
        let page = ListPageController::new(client.clone());
        page.mount().await;

        let ListState::Failed(failure) = page.state() else {
            panic!("expected failure");
        };
        assert!(!failure.unavailable);
        assert_eq!(failure.error, ApiError::Network("refused".into()));
        assert_eq!(client.lists(), 1);
    }

    #[tokio::test]
    async fn missing_orders_endpoint_marks_page_unavailable() {
        let client = FakeVehicles::as_resource(Resource::Orders)
            .then_list(Err(ApiError::NotFound(String::new())));
        let page = ListPageController::new(Arc::new(client));
        page.mount().await;

        let ListState::Failed(failure) = page.state() else {
            panic!("expected failure");
        };
        assert!(failure.unavailable);
        assert_eq!(failure.message, ORDERS_LIST_UNAVAILABLE);
    }

    #[tokio::test]
    async fn rejected_credential_invalidates_the_session() {
        let session = signed_in_session().await;
        let client = FakeVehicles::new().then_list(Err(ApiError::Auth(AuthError::Unauthorized)));
        let page = ListPageController::new(Arc::new(client)).with_session(session.clone());

        assert!(session.is_authenticated());
        page.mount().await;
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn filter_matches_display_fields_case_insensitively() {
        let page = ListPageController::new(Arc::new(FakeVehicles::new().then_list(Ok(fleet()))));
        page.mount().await;

        assert_eq!(page.filter("toy"), vec![vehicle(1, "ABC123", "Toyota")]);
        assert_eq!(page.filter("xyz"), vec![vehicle(2, "XYZ999", "Ford")]);
        assert_eq!(page.filter("ana pérez").len(), 2);
        assert_eq!(page.filter(""), fleet());
        assert_eq!(page.records(), fleet());

        let fords = page.filter_where("", |v| v.brand == "Ford");
        assert_eq!(fords, vec![vehicle(2, "XYZ999", "Ford")]);
        assert!(page.filter_where("toy", |v| v.brand == "Ford").is_empty());
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let client = Arc::new(FakeVehicles::new().then_list(Ok(fleet())));
        let page = ListPageController::new(client.clone());
        page.mount().await;

        let outcome = page.delete(VehicleId::new(1), &Preconfirmed(false)).await;
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(client.mutations(), 0);
        assert_eq!(client.lists(), 1);
    }

    #[tokio::test]
    async fn confirmed_delete_reloads() {
        let client = Arc::new(
            FakeVehicles::new()
                .then_list(Ok(fleet()))
                .then_list(Ok(vec![vehicle(2, "XYZ999", "Ford")])),
        );
        let page = ListPageController::new(client.clone());
        page.mount().await;

        let outcome = page.delete(VehicleId::new(1), &Preconfirmed(true)).await;
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(client.lists(), 2);
        assert_eq!(page.records(), vec![vehicle(2, "XYZ999", "Ford")]);
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_displayed_collection() {
        let client = Arc::new(FakeVehicles::new().then_list(Ok(fleet())));
        let page = ListPageController::new(client.clone());
        page.mount().await;

        client.fail_next_mutation(ApiError::NotFound("Vehículo no encontrado".into()));
        let outcome = page.delete(VehicleId::new(9), &Preconfirmed(true)).await;
        assert_eq!(outcome, DeleteOutcome::Failed("Vehículo no encontrado".into()));
        assert_eq!(page.notice().as_deref(), Some("Vehículo no encontrado"));
        assert_eq!(page.state(), ListState::Loaded(fleet()));
        assert_eq!(client.lists(), 1);
    }

    #[tokio::test]
    async fn refused_delete_signs_out_and_says_so() {
        let session = signed_in_session().await;
        let client = Arc::new(
            FakeVehicles::as_resource(Resource::Marketplace).then_list(Ok(fleet())),
        );
        let page = ListPageController::new(client.clone()).with_session(session.clone());
        page.mount().await;

        client.fail_next_mutation(ApiError::Auth(AuthError::Unauthorized));
        let outcome = page.delete(VehicleId::new(1), &Preconfirmed(true)).await;

        assert_eq!(outcome, DeleteOutcome::Failed(FORBIDDEN.to_string()));
        assert!(!session.is_authenticated());
        assert_eq!(page.state(), ListState::Loaded(fleet()));
    }

    fn arb_vehicle() -> impl Strategy<Value = Vehicle> {
        (1i64..1000, "[A-Z0-9]{3,7}", "[A-Za-z]{1,10}")
            .prop_map(|(id, plate, brand)| vehicle(id, &plate, &brand))
    }

    proptest! {
        #[test]
        fn empty_filter_is_identity(records in prop::collection::vec(arb_vehicle(), 0..20)) {
            let page = ListPageController::new(Arc::new(FakeVehicles::new()));
            page.lock().state = ListState::Loaded(records.clone());
            prop_assert_eq!(page.filter(""), records);
        }

        #[test]
        fn filter_keeps_only_matching_records_in_order(
            records in prop::collection::vec(arb_vehicle(), 0..20),
            term in "[a-zA-Z0-9]{1,3}",
        ) {
            let page = ListPageController::new(Arc::new(FakeVehicles::new()));
            page.lock().state = ListState::Loaded(records.clone());

            let needle = term.to_lowercase();
            let expected: Vec<Vehicle> = records
                .iter()
                .filter(|v| {
                    [v.plate.as_str(), v.brand.as_str(), v.model.as_str(), "Ana Pérez"]
                        .iter()
                        .any(|f| f.to_lowercase().contains(&needle))
                })
                .cloned()
                .collect();
            prop_assert_eq!(page.filter(&term), expected);
        }
    }
}

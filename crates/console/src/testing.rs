//! Scripted fakes shared by the controller tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use tallerpro_auth::{
    AuthBackend, AuthError, Identity, InMemoryCredentialStore, LoginGrant, Role, SessionStore,
};
use tallerpro_client::{ApiError, ApiResult, Resource, ResourceClient};
use tallerpro_core::{ClientId, UserId, VehicleId};
use tallerpro_workshop::{Vehicle, VehicleDraft};

use crate::seams::ReloadTarget;

pub(crate) fn vehicle(id: i64, plate: &str, brand: &str) -> Vehicle {
    Vehicle {
        id: VehicleId::new(id),
        client_id: ClientId::new(1),
        plate: plate.to_string(),
        brand: brand.to_string(),
        model: "Corolla".to_string(),
        year: 2020,
        vin: None,
        client_name: Some("Ana Pérez".to_string()),
    }
}

struct ListStep {
    gate: Option<oneshot::Receiver<()>>,
    result: ApiResult<Vec<Vehicle>>,
}

/// Vehicle client whose answers are scripted up front.
pub(crate) struct FakeVehicles {
    resource: Resource,
    lists: Mutex<VecDeque<ListStep>>,
    mutation_failure: Mutex<Option<ApiError>>,
    mutation_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub(crate) list_calls: AtomicUsize,
    pub(crate) mutation_calls: AtomicUsize,
    pub(crate) updated: Mutex<Vec<VehicleId>>,
}

impl FakeVehicles {
    pub(crate) fn new() -> Self {
        Self::as_resource(Resource::Vehicles)
    }

    pub(crate) fn as_resource(resource: Resource) -> Self {
        Self {
            resource,
            lists: Mutex::new(VecDeque::new()),
            mutation_failure: Mutex::new(None),
            mutation_gate: Mutex::new(None),
            list_calls: AtomicUsize::new(0),
            mutation_calls: AtomicUsize::new(0),
            updated: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn then_list(self, result: ApiResult<Vec<Vehicle>>) -> Self {
        self.queue_list(result);
        self
    }

    pub(crate) fn queue_list(&self, result: ApiResult<Vec<Vehicle>>) {
        self.lists.lock().unwrap().push_back(ListStep { gate: None, result });
    }

    /// Queue a list answer held back until the returned sender fires.
    pub(crate) fn then_list_gated(&self, result: ApiResult<Vec<Vehicle>>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.lists.lock().unwrap().push_back(ListStep {
            gate: Some(rx),
            result,
        });
        tx
    }

    pub(crate) fn fail_next_mutation(&self, err: ApiError) {
        *self.mutation_failure.lock().unwrap() = Some(err);
    }

    pub(crate) fn hold_next_mutation(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.mutation_gate.lock().unwrap() = Some(rx);
        tx
    }

    pub(crate) fn lists(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn mutations(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }

    async fn mutate(&self) -> ApiResult<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.mutation_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        match self.mutation_failure.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ResourceClient for FakeVehicles {
    type Record = Vehicle;
    type Draft = VehicleDraft;

    fn resource(&self) -> Resource {
        self.resource
    }

    async fn list(&self) -> ApiResult<Vec<Vehicle>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let step = self.lists.lock().unwrap().pop_front();
        let Some(step) = step else {
            return Ok(Vec::new());
        };
        if let Some(gate) = step.gate {
            let _ = gate.await;
        }
        step.result
    }

    async fn create(&self, draft: &VehicleDraft) -> ApiResult<Vehicle> {
        self.mutate().await?;
        Ok(vehicle(100, &draft.plate, &draft.brand))
    }

    async fn update(&self, id: VehicleId, draft: &VehicleDraft) -> ApiResult<Vehicle> {
        self.mutate().await?;
        self.updated.lock().unwrap().push(id);
        Ok(vehicle(id.get(), &draft.plate, &draft.brand))
    }

    async fn delete(&self, _id: VehicleId) -> ApiResult<()> {
        self.mutate().await
    }
}

/// Counts reload requests.
#[derive(Default)]
pub(crate) struct CountingReload {
    pub(crate) count: AtomicUsize,
}

impl CountingReload {
    pub(crate) fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReloadTarget for CountingReload {
    async fn request_reload(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

struct AcceptAll;

#[async_trait]
impl AuthBackend for AcceptAll {
    async fn login(&self, email: &str, _password: &str) -> Result<LoginGrant, AuthError> {
        Ok(LoginGrant {
            token: "tok".to_string(),
            identity: Identity {
                id: UserId::new(1),
                username: "admin".to_string(),
                email: email.to_string(),
                role: Role::ADMIN,
                created_at: None,
            },
        })
    }

    async fn current_identity(&self, _token: &str) -> Result<Identity, AuthError> {
        Err(AuthError::Unauthorized)
    }
}

pub(crate) async fn signed_in_session() -> SessionStore {
    let session = SessionStore::new(Arc::new(AcceptAll), Arc::new(InMemoryCredentialStore::new()));
    session.hydrate().await;
    session
        .login("admin@taller.pro", "secret")
        .await
        .expect("fake login");
    session
}

/// Yield until `done` holds; the spawned task under test needs polling.
pub(crate) async fn until(done: impl Fn() -> bool) {
    for _ in 0..1000 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

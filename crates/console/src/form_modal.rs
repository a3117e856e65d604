//! Create/edit modal for one resource type.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tallerpro_auth::SessionStore;
use tallerpro_client::{ApiError, Endpoint, Operation, ResourceClient, user_message};
use tallerpro_core::{Draft, EditableDraft, Entity};

use crate::seams::ReloadTarget;

#[derive(Debug, Clone, PartialEq)]
pub enum ModalState<D> {
    Closed,
    /// Editable. `error` holds the last validation or server message.
    Open { draft: D, error: Option<String> },
    /// A create/update is in flight; the submit affordance is disabled.
    Submitting { draft: D },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<T> {
    /// Saved and the owner was asked to reload. The modal is closed.
    Saved(T),
    /// A required field is empty; nothing was sent.
    Invalid(String),
    /// The backend refused; the modal stays open with this message.
    Failed(String),
    /// The modal was not open, or a submission is already in flight.
    Ignored,
}

struct ModalInner<C: ResourceClient> {
    state: ModalState<C::Draft>,
    /// Record being edited; `None` means create.
    target: Option<<C::Record as Entity>::Id>,
}

/// Drives one draft from open to saved.
///
/// The owning page is reloaded exactly once per successful save; the
/// modal never touches the page's collection directly.
pub struct FormModalController<C: ResourceClient> {
    client: Arc<C>,
    owner: Arc<dyn ReloadTarget>,
    session: Option<SessionStore>,
    inner: Mutex<ModalInner<C>>,
}

impl<C: ResourceClient> FormModalController<C> {
    pub fn new(client: Arc<C>, owner: Arc<dyn ReloadTarget>) -> Self {
        Self {
            client,
            owner,
            session: None,
            inner: Mutex::new(ModalInner {
                state: ModalState::Closed,
                target: None,
            }),
        }
    }

    pub fn with_session(mut self, session: SessionStore) -> Self {
        self.session = Some(session);
        self
    }

    fn lock(&self) -> MutexGuard<'_, ModalInner<C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ModalState<C::Draft> {
        self.lock().state.clone()
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.lock().state, ModalState::Closed)
    }

    pub fn is_submit_enabled(&self) -> bool {
        matches!(self.lock().state, ModalState::Open { .. })
    }

    pub fn is_editing(&self) -> bool {
        self.lock().target.is_some()
    }

    pub fn draft(&self) -> Option<C::Draft> {
        match &self.lock().state {
            ModalState::Closed => None,
            ModalState::Open { draft, .. } | ModalState::Submitting { draft } => Some(draft.clone()),
        }
    }

    fn open_with(&self, draft: C::Draft, target: Option<<C::Record as Entity>::Id>) -> bool {
        let mut inner = self.lock();
        if matches!(inner.state, ModalState::Submitting { .. }) {
            return false;
        }
        inner.state = ModalState::Open { draft, error: None };
        inner.target = target;
        true
    }

    /// Open for a new record, seeded with the resource's defaults.
    pub fn open_create(&self) -> bool {
        self.open_with(C::Draft::blank(), None)
    }

    /// Open for `record`, seeded with its current values.
    pub fn open_edit(&self, record: &C::Record) -> bool
    where
        C::Draft: EditableDraft<Record = C::Record>,
    {
        self.open_with(C::Draft::from_record(record), Some(*record.id()))
    }

    /// Discard the draft. Refused while a submission is in flight.
    pub fn close(&self) -> bool {
        let mut inner = self.lock();
        if matches!(inner.state, ModalState::Submitting { .. }) {
            return false;
        }
        inner.state = ModalState::Closed;
        inner.target = None;
        true
    }

    /// Change the open draft. Returns `false` when there is nothing to edit.
    pub fn edit<F>(&self, change: F) -> bool
    where
        F: FnOnce(&mut C::Draft),
    {
        match &mut self.lock().state {
            ModalState::Open { draft, .. } => {
                change(draft);
                true
            }
            _ => false,
        }
    }

    pub async fn submit(&self) -> SubmitOutcome<C::Record> {
        let resource = self.client.resource();

        let (draft, target) = {
            let mut inner = self.lock();
            let ModalState::Open { draft, .. } = &inner.state else {
                return SubmitOutcome::Ignored;
            };
            let draft = draft.clone();
            let operation = match inner.target {
                Some(_) => Operation::Update,
                None => Operation::Create,
            };

            if let Err(err) = draft.validate() {
                let message = user_message(&ApiError::from(err), Endpoint::new(resource, operation));
                tracing::debug!(%resource, "draft rejected locally: {message}");
                inner.state = ModalState::Open {
                    draft,
                    error: Some(message.clone()),
                };
                return SubmitOutcome::Invalid(message);
            }

            inner.state = ModalState::Submitting {
                draft: draft.clone(),
            };
            (draft, inner.target)
        };

        let (operation, result) = match target {
            Some(id) => (Operation::Update, self.client.update(id, &draft).await),
            None => (Operation::Create, self.client.create(&draft).await),
        };

        match result {
            Ok(record) => {
                {
                    let mut inner = self.lock();
                    inner.state = ModalState::Closed;
                    inner.target = None;
                }
                tracing::info!(%resource, %operation, id = %record.id(), "record saved");
                self.owner.request_reload().await;
                SubmitOutcome::Saved(record)
            }
            Err(err) => {
                if err.is_unauthorized() {
                    if let Some(session) = &self.session {
                        session.invalidate("backend rejected the session credential").await;
                    }
                }
                let message = user_message(&err, Endpoint::new(resource, operation));
                tracing::warn!(%resource, %operation, "save failed: {err}");
                self.lock().state = ModalState::Open {
                    draft,
                    error: Some(message.clone()),
                };
                SubmitOutcome::Failed(message)
            }
        }
    }
}

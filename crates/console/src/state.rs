//! The context every page is built from.

use std::sync::Arc;

use tallerpro_auth::{CredentialStore, Identity, Registration, RouteGate, SessionStore};
use tallerpro_client::messages::REGISTERED;
use tallerpro_client::{
    ApiError, ApiResult, AuthApi, ClientsClient, Endpoint, HttpTransport, MarketplaceClient,
    OrdersClient, PaymentsClient, ResourceClient, ServicesClient, TechniciansClient,
    VehiclesClient, user_message,
};

use crate::config::ConsoleConfig;
use crate::form_modal::FormModalController;
use crate::list_page::ListPageController;

/// Application state shared by every page.
///
/// There is exactly one transport: the anonymous one is used for the auth
/// endpoints, and a clone carrying the session's token for everything else.
#[derive(Clone)]
pub struct AppState {
    pub config: ConsoleConfig,
    pub session: SessionStore,
    pub auth: Arc<AuthApi>,
    pub transport: HttpTransport,
    pub vehicles: Arc<VehiclesClient>,
    pub clients: Arc<ClientsClient>,
    pub technicians: Arc<TechniciansClient>,
    pub orders: Arc<OrdersClient>,
    pub services: Arc<ServicesClient>,
    pub payments: Arc<PaymentsClient>,
    pub marketplace: Arc<MarketplaceClient>,
}

impl AppState {
    /// Wire the clients to `config.api_url`. The session starts hydrating;
    /// call `session.hydrate()` before the first gate evaluation.
    pub fn new(config: ConsoleConfig, credentials: Arc<dyn CredentialStore>) -> ApiResult<Self> {
        let anonymous = match config.request_timeout {
            Some(timeout) => HttpTransport::with_timeout(config.api_url.clone(), timeout)?,
            None => HttpTransport::new(config.api_url.clone()),
        };

        let auth = Arc::new(AuthApi::new(anonymous.clone()));
        let session = SessionStore::new(auth.clone(), credentials);
        let transport = anonymous.with_credentials(Arc::new(session.clone()));

        tracing::info!(api_url = %config.api_url, "console state initialized");

        Ok(Self {
            vehicles: Arc::new(VehiclesClient::new(transport.clone())),
            clients: Arc::new(ClientsClient::new(transport.clone())),
            technicians: Arc::new(TechniciansClient::new(transport.clone())),
            orders: Arc::new(OrdersClient::new(transport.clone())),
            services: Arc::new(ServicesClient::new(transport.clone())),
            payments: Arc::new(PaymentsClient::new(transport.clone())),
            marketplace: Arc::new(MarketplaceClient::new(transport.clone())),
            config,
            session,
            auth,
            transport,
        })
    }

    /// Gate for the authenticated area.
    pub fn gate(&self) -> RouteGate {
        RouteGate::new()
    }

    /// A list page bound to this session.
    pub fn page<C: ResourceClient>(&self, client: &Arc<C>) -> Arc<ListPageController<C>> {
        Arc::new(ListPageController::new(client.clone()).with_session(self.session.clone()))
    }

    /// A modal that reloads `page` after each successful save.
    pub fn modal<C: ResourceClient + 'static>(
        &self,
        client: &Arc<C>,
        page: &Arc<ListPageController<C>>,
    ) -> FormModalController<C> {
        FormModalController::new(client.clone(), page.clone()).with_session(self.session.clone())
    }

    /// Sign in; on failure the message is ready to show.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, String> {
        self.session
            .login(email, password)
            .await
            .map_err(|err| user_message(&ApiError::from(err), Endpoint::LOGIN))
    }

    /// Create an account. On success returns the notice the login page shows;
    /// the new account is not signed in.
    pub async fn sign_up(&self, registration: &Registration) -> Result<&'static str, String> {
        match self.auth.register(registration).await {
            Ok(_) => Ok(REGISTERED),
            Err(err) => Err(user_message(&err, Endpoint::REGISTER)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use tallerpro_auth::{GateDecision, InMemoryCredentialStore};
    use tallerpro_client::Resource;
    use tallerpro_client::messages::NETWORK_UNREACHABLE;
    use tallerpro_core::Draft;
    use tallerpro_observability::LogFormat;

    use crate::form_modal::SubmitOutcome;

    fn offline_state() -> AppState {
        let config = ConsoleConfig {
            api_url: "http://127.0.0.1:1".into(),
            data_dir: PathBuf::from("/tmp/tallerpro-unused"),
            request_timeout: None,
            log_format: LogFormat::Json,
        };
        AppState::new(config, Arc::new(InMemoryCredentialStore::new())).unwrap()
    }

    #[tokio::test]
    async fn every_client_shares_the_configured_base_url() {
        let state = offline_state();
        assert_eq!(state.transport.base_url(), "http://127.0.0.1:1");
        assert_eq!(state.gate().evaluate(&state.session.snapshot()), GateDecision::Loading);

        state.session.hydrate().await;
        assert!(matches!(
            state.gate().evaluate(&state.session.snapshot()),
            GateDecision::Redirect { .. }
        ));
    }

    #[tokio::test]
    async fn offline_sign_in_and_sign_up_report_connectivity() {
        let state = offline_state();
        state.session.hydrate().await;

        let err = state.sign_in("ana@taller.pro", "secret").await.unwrap_err();
        assert_eq!(err, NETWORK_UNREACHABLE);
        assert!(!state.session.is_authenticated());

        let mut registration = Registration::blank();
        registration.username = "ana".into();
        registration.email = "ana@taller.pro".into();
        registration.password = "secret".into();
        assert_eq!(state.sign_up(&registration).await, Err(NETWORK_UNREACHABLE.to_string()));
    }

    #[tokio::test]
    async fn order_form_only_opens_new_orders() {
        let state = offline_state();
        assert_eq!(state.services.resource(), Resource::Services);
        assert_eq!(state.payments.resource(), Resource::Payments);

        let page = state.page(&state.orders);
        let modal = state.modal(&state.orders, &page);
        assert!(modal.open_create());
        assert!(!modal.is_editing());
        // Nothing reaches the unreachable backend: the vehicle is missing.
        assert!(matches!(modal.submit().await, SubmitOutcome::Invalid(_)));
    }
}

//! `tallerpro-client`: typed access to the TallerPro REST backend.
//!
//! One [`HttpTransport`] is configured with the API base URL and shared by
//! every resource client; the bearer token is read from a
//! [`tallerpro_auth::CredentialSource`] on each request.
//!
//! The base URL is the backend's origin. Paths carry the backend's own
//! mount points, which are mixed: `/auth`, `/clients`, `/vehicles`,
//! `/orders` and `/services` sit at the root, while users, marketplace,
//! payments and the health check live under `/api`.

pub mod auth_api;
pub mod clients;
pub mod error;
pub mod marketplace;
pub mod messages;
pub mod orders;
pub mod payments;
pub mod resource;
pub mod services;
pub mod technicians;
pub mod transport;
pub mod vehicles;

pub use auth_api::AuthApi;
pub use clients::ClientsClient;
pub use error::{ApiError, ApiResult};
pub use marketplace::MarketplaceClient;
pub use messages::{Endpoint, user_message};
pub use orders::OrdersClient;
pub use payments::PaymentsClient;
pub use resource::{Operation, Resource, ResourceClient};
pub use services::ServicesClient;
pub use technicians::TechniciansClient;
pub use transport::HttpTransport;
pub use vehicles::VehiclesClient;

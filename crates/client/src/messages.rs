//! The one place backend failures become text for the user.

use tallerpro_auth::AuthError;

use crate::resource::{Operation, Resource};
use crate::ApiError;

pub const NETWORK_UNREACHABLE: &str =
    "No se pudo conectar con el servidor. Verifica tu conexión.";
pub const ORDERS_LIST_UNAVAILABLE: &str =
    "El endpoint GET /orders no está implementado en el backend. Lista no disponible.";
pub const SESSION_EXPIRED: &str = "Tu sesión ha expirado. Inicia sesión de nuevo.";
/// A refused delete. 401 and 403 both drop the session, so the message says so.
pub const FORBIDDEN: &str =
    "No tienes permiso para realizar esta acción. Tu sesión se ha cerrado; inicia sesión de nuevo.";
pub const UNEXPECTED_RESPONSE: &str = "Respuesta inesperada del servidor.";
pub const REGISTERED: &str = "Registro exitoso. Ahora puedes iniciar sesión.";

/// The call a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub resource: Resource,
    pub operation: Operation,
}

impl Endpoint {
    pub const ORDERS_LIST: Endpoint = Endpoint::new(Resource::Orders, Operation::List);
    pub const LOGIN: Endpoint = Endpoint::new(Resource::Auth, Operation::Login);
    pub const REGISTER: Endpoint = Endpoint::new(Resource::Auth, Operation::Register);

    pub const fn new(resource: Resource, operation: Operation) -> Self {
        Self {
            resource,
            operation,
        }
    }

    /// `404` here means the endpoint is missing, not the record.
    pub fn is_optional(&self) -> bool {
        *self == Self::ORDERS_LIST
    }

    fn fallback(&self) -> &'static str {
        match (self.resource, self.operation) {
            (_, Operation::Login) => "Error al iniciar sesión. Verifica tus credenciales.",
            (_, Operation::Register) => {
                "Error al registrarse. Verifica la conexión con el servidor."
            }
            (Resource::Vehicles, Operation::List) => "No se pudieron cargar los vehículos.",
            (Resource::Clients, Operation::List) => "No se pudieron cargar los clientes.",
            (Resource::Technicians, Operation::List) => "No se pudieron cargar los técnicos.",
            (Resource::Orders, Operation::List) => "No se pudieron cargar las órdenes.",
            (Resource::Marketplace, Operation::List) => "No se pudieron cargar las publicaciones.",
            (Resource::Services, Operation::List) => "No se pudieron cargar los servicios.",
            (Resource::Payments, Operation::List) => "No se pudo cargar el historial de pagos.",
            (Resource::Vehicles, Operation::Delete) => "Error al eliminar el vehículo",
            (Resource::Vehicles, _) => "Error al guardar el vehículo",
            (Resource::Clients, _) => "Error al guardar el cliente",
            (Resource::Orders, _) => "Error al guardar la orden",
            (Resource::Services, _) => "Error al crear el servicio",
            (Resource::Payments, _) => "Error al registrar el pago",
            (Resource::Marketplace, Operation::Delete) => "Error al eliminar la publicación",
            (Resource::Marketplace, _) => "Error al crear la publicación",
            _ => "Ocurrió un error inesperado.",
        }
    }
}

fn or_fallback(message: &str, endpoint: &Endpoint) -> String {
    if message.trim().is_empty() {
        endpoint.fallback().to_string()
    } else {
        message.to_string()
    }
}

/// Message shown for `err` raised by `endpoint`.
///
/// Server-reported messages are passed through verbatim.
pub fn user_message(err: &ApiError, endpoint: Endpoint) -> String {
    match err {
        ApiError::NotFound(_) if endpoint.is_optional() => ORDERS_LIST_UNAVAILABLE.to_string(),
        ApiError::NotFound(message) => or_fallback(message, &endpoint),
        ApiError::Validation { message, .. } => or_fallback(message, &endpoint),
        ApiError::Transport { message, .. } => or_fallback(message, &endpoint),
        ApiError::Network(_) => NETWORK_UNREACHABLE.to_string(),
        ApiError::Parse(_) => UNEXPECTED_RESPONSE.to_string(),
        ApiError::Unsupported { .. } => endpoint.fallback().to_string(),
        ApiError::Auth(auth) => match auth {
            AuthError::InvalidCredentials(message) => or_fallback(message, &endpoint),
            AuthError::Unauthorized if endpoint.operation == Operation::Delete => {
                FORBIDDEN.to_string()
            }
            AuthError::Unauthorized => SESSION_EXPIRED.to_string(),
            AuthError::Network(_) => NETWORK_UNREACHABLE.to_string(),
            AuthError::Backend { message, .. } => or_fallback(message, &endpoint),
        },
    }
}

//! Bearer authentication middleware for protecting API endpoints.
//!
//! The middleware extracts the bearer credential from the Authorization
//! header, runs it through the token lifecycle manager found in app data,
//! and injects the authenticated subject into the request. When the
//! manager offers a renewal for an expired-but-in-grace token, the
//! replacement is surfaced to the client on the Authorization response
//! header so it can be adopted for subsequent requests.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorInternalServerError, ErrorUnauthorized, InternalError},
    http::header::{HeaderValue, AUTHORIZATION},
    web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use tracing::debug;

use gj_core::services::token::{RejectionReason, TokenService, ValidationOutcome};

use crate::dto::ErrorResponse;

/// Credential scheme prefix on the wire
const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated subject injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Subject recovered from the validated token
    pub subject: String,
}

/// Bearer authentication middleware factory
///
/// Requires a `TokenService` registered as actix app data.
#[derive(Default)]
pub struct GraceAuth;

impl<S, B> Transform<S, ServiceRequest> for GraceAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = GraceAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(GraceAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Bearer authentication middleware service
pub struct GraceAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for GraceAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // Absence or a malformed scheme is rejected before the
            // lifecycle manager ever runs.
            let token = match extract_bearer_token(&req) {
                Ok(token) => token,
                Err(err) => return Err(err),
            };

            let Some(manager) = req.app_data::<web::Data<TokenService>>().cloned() else {
                return Err(ErrorInternalServerError("Token service not configured"));
            };

            match manager.validate(&token).await {
                Ok(ValidationOutcome::Accepted { subject }) => {
                    req.extensions_mut().insert(AuthContext { subject });
                    service.call(req).await
                }
                Ok(ValidationOutcome::RenewalOffered {
                    subject,
                    replacement,
                }) => {
                    debug!(%subject, "Offering replacement token on the response");
                    req.extensions_mut().insert(AuthContext { subject });
                    let mut res = service.call(req).await?;
                    if let Ok(value) = HeaderValue::from_str(&format!("{BEARER_PREFIX}{replacement}"))
                    {
                        res.headers_mut().insert(AUTHORIZATION, value);
                    }
                    Ok(res)
                }
                Ok(ValidationOutcome::Rejected(reason)) => Err(denial(reason)),
                Err(err) => Err(ErrorInternalServerError(format!(
                    "Token validation failed: {err}"
                ))),
            }
        })
    }
}

/// Extracts the bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Result<String, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| ErrorUnauthorized("Authorization header required"))?;

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ErrorUnauthorized("Invalid authorization format"))
}

/// Builds the 401 denial carrying a reason-coded body
fn denial(reason: RejectionReason) -> Error {
    let message = match reason {
        RejectionReason::Revoked => "Token revoked",
        RejectionReason::Expired => "Token expired",
        RejectionReason::Invalid => "Invalid token",
    };
    let body = ErrorResponse::new(reason.as_str(), message);
    InternalError::from_response(message, HttpResponse::Unauthorized().json(body)).into()
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}

/// Extractor for optional authentication
pub struct OptionalAuth(pub Option<AuthContext>);

impl FromRequest for OptionalAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let auth = req.extensions().get::<AuthContext>().cloned();
        ready(Ok(OptionalAuth(auth)))
    }
}

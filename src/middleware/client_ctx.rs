//! Per-request client context.
//!
//! Extractor that resolves the session cookie to a user profile once per
//! handler. None means a guest; handlers that need an account call
//! [`ClientCtx::require_user`].

use crate::session::authenticate_by_cookie;
use crate::user::Profile;
use actix_session::SessionExt;
use actix_web::dev::Payload;
use actix_web::{error, Error, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;

/// Client data resolved for a single request cycle.
#[derive(Clone, Debug, Default)]
pub struct ClientCtx {
    /// User data. None is a guest.
    client: Option<Profile>,
}

impl ClientCtx {
    pub async fn from_session(session: &actix_session::Session) -> Self {
        Self {
            client: authenticate_by_cookie(session).await,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.client.is_some()
    }

    pub fn get_user(&self) -> Option<&Profile> {
        self.client.as_ref()
    }

    pub fn get_user_id(&self) -> Option<i32> {
        self.client.as_ref().map(|u| u.id)
    }

    pub fn get_name(&self) -> String {
        self.client
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_default()
    }

    /// The logged-in user, or a 401 for guests.
    pub fn require_user(&self) -> Result<&Profile, Error> {
        self.client
            .as_ref()
            .ok_or_else(|| error::ErrorUnauthorized("You must be logged in for that."))
    }
}

impl FromRequest for ClientCtx {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = req.get_session();
        Box::pin(async move { Ok(ClientCtx::from_session(&session).await) })
    }
}

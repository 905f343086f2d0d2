//! Session header helpers.

use salvo::{
    http::header::HeaderValue,
    prelude::{Request, Response, StatusError},
};

use storefront_app::domain::carts::SessionId;

use crate::extensions::*;

/// Header carrying the caller's session id, both ways.
pub(crate) const SESSION_ID_HEADER: &str = "x-session-id";

pub(crate) trait SessionExt {
    /// The session named by the request, if a usable one was sent.
    fn session_id(&self) -> Option<SessionId>;

    /// The session named by the request, or 400 when there is none.
    fn session_id_or_400(&self) -> Result<SessionId, StatusError>;

    /// The session named by the request, or a freshly minted one. Either way
    /// the id is echoed back on `res` so the caller can keep using it.
    fn session_id_or_new(&self, res: &mut Response) -> Result<SessionId, StatusError>;
}

impl SessionExt for Request {
    fn session_id(&self) -> Option<SessionId> {
        self.header::<String>(SESSION_ID_HEADER)
            .and_then(|raw| SessionId::parse(&raw))
    }

    fn session_id_or_400(&self) -> Result<SessionId, StatusError> {
        self.session_id()
            .ok_or_else(|| StatusError::bad_request().brief("X-Session-ID header is required"))
    }

    fn session_id_or_new(&self, res: &mut Response) -> Result<SessionId, StatusError> {
        let session = self.session_id().unwrap_or_else(SessionId::generate);

        let value =
            HeaderValue::from_str(session.as_str()).or_500("failed to encode session header")?;

        res.headers_mut().insert(SESSION_ID_HEADER, value);

        Ok(session)
    }
}

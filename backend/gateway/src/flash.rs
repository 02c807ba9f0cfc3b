//! Signed flash notices.
//!
//! Notices raised while handling a POST survive the redirect in a cookie
//! holding `hex(json).hex(hmac_sha256)`. The next rendered page reads them
//! and clears the cookie. Cookies with a bad signature are ignored.

use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use smilecheck_core::Notice;
use tracing::{debug, warn};

pub const FLASH_COOKIE: &str = "smilecheck_flash";

const COOKIE_ATTRIBUTES: &str = "Path=/; HttpOnly; SameSite=Lax";

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct FlashSigner {
    keyed: Arc<HmacSha256>,
}

impl FlashSigner {
    pub fn new(secret: &str) -> anyhow::Result<Self> {
        let keyed = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| anyhow::anyhow!("invalid flash signing key: {e}"))?;
        Ok(Self { keyed: Arc::new(keyed) })
    }

    fn mac(&self) -> HmacSha256 {
        self.keyed.as_ref().clone()
    }

    /// Cookie value carrying `notices`.
    pub fn encode(&self, notices: &[Notice]) -> String {
        let payload = hex::encode(serde_json::to_vec(notices).unwrap_or_default());
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        let signature = hex::encode(mac.finalize().into_bytes());
        format!("{payload}.{signature}")
    }

    /// Verify and decode a cookie value.
    pub fn decode(&self, value: &str) -> Option<Vec<Notice>> {
        let (payload, signature) = value.split_once('.')?;
        let signature = hex::decode(signature).ok()?;

        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        if mac.verify_slice(&signature).is_err() {
            warn!("Ignoring flash cookie with invalid signature");
            return None;
        }

        let json = hex::decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }

    /// Notices carried by the request's flash cookie, if any.
    pub fn read(&self, headers: &HeaderMap) -> Vec<Notice> {
        cookie_value(headers)
            .and_then(|value| self.decode(value))
            .unwrap_or_default()
    }

    pub fn set_cookie(&self, notices: &[Notice]) -> HeaderValue {
        let cookie = format!("{FLASH_COOKIE}={}; {COOKIE_ATTRIBUTES}", self.encode(notices));
        // Hex and fixed attributes are always valid header bytes.
        HeaderValue::from_str(&cookie).unwrap_or_else(|_| clear_cookie())
    }

    /// Redirect to `to`, carrying pending notices plus `notices`.
    pub fn redirect(&self, request_headers: &HeaderMap, to: &str, notices: Vec<Notice>) -> Response {
        let mut pending = self.read(request_headers);
        pending.extend(notices);
        debug!(to, notices = pending.len(), "Redirecting with flash notices");
        (
            AppendHeaders([(header::SET_COOKIE, self.set_cookie(&pending))]),
            Redirect::to(to),
        )
            .into_response()
    }
}

/// Raw value of the request's flash cookie.
fn cookie_value(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == FLASH_COOKIE)
        .map(|(_, value)| value)
}

/// Whether the request sent a flash cookie, valid or not.
pub fn has_flash_cookie(headers: &HeaderMap) -> bool {
    cookie_value(headers).is_some()
}

/// Expire the flash cookie.
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("smilecheck_flash=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

//! Identity cookie store.
//!
//! The SSO provider lands the user back on the portal with an identity
//! token; the portal keeps it in a short-lived `sso_id` cookie next to a
//! boolean `sso` companion. Both are scoped to `/` with `SameSite=Lax`.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};

/// Cookie carrying the raw SSO identity token.
pub const IDENTITY_COOKIE: &str = "sso_id";

/// Companion flag cookie set alongside the identity token.
pub const SSO_FLAG_COOKIE: &str = "sso";

/// Default identity cookie lifetime (15 minutes).
pub const DEFAULT_MAX_AGE_SECS: i64 = 900;

/// Write `name=value` with path `/`, the given max-age and a lax same-site policy.
pub fn set_cookie(jar: CookieJar, name: &str, value: &str, max_age_secs: i64) -> CookieJar {
    let cookie = Cookie::build((name.to_owned(), value.to_owned()))
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .same_site(SameSite::Lax);
    jar.add(cookie)
}

/// Overwrite the cookie with an already-expired one so the browser drops it.
pub fn delete_cookie(jar: CookieJar, name: &str) -> CookieJar {
    let cookie = Cookie::build((name.to_owned(), String::new()))
        .path("/")
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .same_site(SameSite::Lax);
    jar.add(cookie)
}

/// The raw identity token, if the request carries one.
pub fn identity_token(jar: &CookieJar) -> Option<String> {
    jar.get(IDENTITY_COOKIE).map(|c| c.value().to_owned())
}

/// Store the identity token and the `sso` flag.
pub fn establish_sso_session(jar: CookieJar, token: &str, max_age_secs: i64) -> CookieJar {
    let jar = set_cookie(jar, IDENTITY_COOKIE, token, max_age_secs);
    set_cookie(jar, SSO_FLAG_COOKIE, "true", max_age_secs)
}

/// Expire both SSO cookies.
pub fn clear_sso_session(jar: CookieJar) -> CookieJar {
    let jar = delete_cookie(jar, IDENTITY_COOKIE);
    delete_cookie(jar, SSO_FLAG_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{COOKIE, SET_COOKIE};
    use axum::http::HeaderMap;
    use axum::response::IntoResponse;

    fn set_cookie_headers(jar: CookieJar) -> Vec<String> {
        let response = jar.into_response();
        response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn set_cookie_uses_root_path_max_age_and_lax() {
        let jar = set_cookie(CookieJar::new(), IDENTITY_COOKIE, "19224666K", DEFAULT_MAX_AGE_SECS);
        let cookie = jar.get(IDENTITY_COOKIE).unwrap();
        assert_eq!(cookie.value(), "19224666K");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(900)));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));

        let headers = set_cookie_headers(jar);
        assert_eq!(headers.len(), 1);
        assert!(headers[0].starts_with("sso_id=19224666K"));
        assert!(headers[0].contains("Max-Age=900"));
        assert!(headers[0].contains("SameSite=Lax"));
        assert!(headers[0].contains("Path=/"));
    }

    #[test]
    fn delete_cookie_writes_an_expired_cookie() {
        let jar = delete_cookie(CookieJar::new(), IDENTITY_COOKIE);
        let cookie = jar.get(IDENTITY_COOKIE).unwrap();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));

        let headers = set_cookie_headers(jar);
        assert!(headers[0].contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }

    #[test]
    fn identity_token_reads_request_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, "sso=true; sso_id=19-224-666-K".parse().unwrap());
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(identity_token(&jar).as_deref(), Some("19-224-666-K"));
        assert_eq!(identity_token(&CookieJar::new()), None);
    }

    #[test]
    fn sso_session_sets_and_clears_both_cookies() {
        let jar = establish_sso_session(CookieJar::new(), "abc", 60);
        assert_eq!(jar.get(SSO_FLAG_COOKIE).unwrap().value(), "true");
        assert_eq!(set_cookie_headers(jar).len(), 2);

        let cleared = set_cookie_headers(clear_sso_session(CookieJar::new()));
        assert_eq!(cleared.len(), 2);
        assert!(cleared.iter().all(|h| h.contains("Max-Age=0")));
    }
}

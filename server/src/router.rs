use serde::Serialize;
use sweeper_protocol::{ClickRequest, ErrorKind, ErrorResponse, NewGameRequest, ResetRequest, decode, encode};
use web_time::Instant;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
    Other,
}

/// Transport-independent view of an incoming request.
#[derive(Copy, Clone, Debug)]
pub struct HttpRequest<'a> {
    pub method: Method,
    pub path: &'a str,
    /// Raw `Cookie` header.
    pub cookie: Option<&'a str>,
    pub body: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Always JSON.
    pub body: String,
    pub set_cookie: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Route<'a> {
    Difficulties,
    Games,
    Game(&'a str),
    Click,
    Reset,
}

impl<'a> Route<'a> {
    fn parse(path: &'a str) -> Option<Self> {
        let path = path.split_once('?').map_or(path, |(path, _)| path);
        let path = path.trim_end_matches('/');
        match path {
            "/difficulties" => Some(Self::Difficulties),
            "/games" => Some(Self::Games),
            "/click" => Some(Self::Click),
            "/reset" => Some(Self::Reset),
            _ => {
                let id = path.strip_prefix("/games/")?;
                (!id.is_empty() && !id.contains('/')).then_some(Self::Game(id))
            }
        }
    }
}

/// Finds the session id in a `Cookie` header, ignoring malformed values.
pub fn session_from_cookie(header: &str, cookie_name: &str) -> Option<SessionId> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| value.trim().parse().ok())
}

impl GameService {
    /// Routes one request. Expired sessions are swept before handling it.
    pub fn handle(&self, request: &HttpRequest<'_>, now: Instant) -> HttpResponse {
        self.store().evict_expired(now);

        match self.dispatch(request, now) {
            Ok(response) => response,
            Err(err) => {
                log::warn!(
                    "{:?} {} failed with {}: {}",
                    request.method,
                    request.path,
                    err.status(),
                    err
                );
                json_response(err.status(), &err.to_response())
            }
        }
    }

    fn dispatch(&self, request: &HttpRequest<'_>, now: Instant) -> Result<HttpResponse> {
        use Method::*;

        let route = Route::parse(request.path)
            .ok_or_else(|| ServiceError::RouteNotFound(request.path.into()))?;
        let session = request
            .cookie
            .and_then(|header| session_from_cookie(header, &self.config().cookie_name));
        let known_session = || session.ok_or(ServiceError::SessionNotFound);
        log::debug!("{:?} {:?} session {:?}", request.method, route, session);

        Ok(match (route, request.method) {
            (Route::Difficulties, Get) => json_response(200, &self.difficulties()),
            (Route::Games, Get) => json_response(200, &self.list_games(known_session()?, now)?),
            (Route::Games, Post) => {
                let new_game: NewGameRequest = if request.body.trim().is_empty() {
                    NewGameRequest::default()
                } else {
                    decode(request.body)?
                };
                let (session, created) = self.open_session(session, now);
                let mut response = json_response(201, &self.create_game(session, new_game, now)?);
                if created {
                    response.set_cookie = Some(self.session_cookie(session));
                }
                response
            }
            (Route::Game(id), Get) => json_response(200, &self.get_game(known_session()?, id, now)?),
            (Route::Game(id), Delete) => {
                json_response(200, &self.delete_game(known_session()?, id, now)?)
            }
            (Route::Click, Post) => {
                let click: ClickRequest = decode(request.body)?;
                json_response(200, &self.click(known_session()?, click, now)?)
            }
            (Route::Reset, Post) => {
                let reset: ResetRequest = decode(request.body)?;
                json_response(200, &self.reset_game(known_session()?, reset, now)?)
            }
            _ => return Err(ServiceError::MethodNotAllowed(request.path.into())),
        })
    }

    fn session_cookie(&self, session: SessionId) -> String {
        let config = self.config();
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            config.cookie_name, session, config.session_ttl_secs
        )
    }
}

fn json_response<T: Serialize>(status: u16, message: &T) -> HttpResponse {
    match encode(message) {
        Ok(body) => HttpResponse {
            status,
            body,
            set_cookie: None,
        },
        Err(err) => {
            log::error!("Could not encode response: {}", err);
            let fallback = ErrorResponse::new(ErrorKind::Internal, "response encoding failed");
            HttpResponse {
                status: 500,
                body: encode(&fallback).unwrap_or_default(),
                set_cookie: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_are_parsed_with_trailing_slash_and_query() {
        assert_eq!(Route::parse("/games/"), Some(Route::Games));
        assert_eq!(Route::parse("/click?x=1"), Some(Route::Click));
        assert_eq!(Route::parse("/games/abc"), Some(Route::Game("abc")));
        assert_eq!(Route::parse("/games/abc/def"), None);
        assert_eq!(Route::parse("/"), None);
    }

    #[test]
    fn session_cookie_is_found_among_others() {
        let id = SessionId::from_raw(0xbeef);
        let header = format!("theme=dark; sweeper_session={id}; lang=ja");

        assert_eq!(session_from_cookie(&header, "sweeper_session"), Some(id));
        assert_eq!(session_from_cookie("sweeper_session=zzz", "sweeper_session"), None);
        assert_eq!(session_from_cookie("", "sweeper_session"), None);
    }
}

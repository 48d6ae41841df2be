use std::sync::OnceLock;

use worker::{Context, Env, Headers, Request, Response, event};

use crate::{GameService, HttpRequest, Method, ServerConfig};

static SERVICE: OnceLock<GameService> = OnceLock::new();

/// Helper function to use JavaScript's Math.random
fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_le_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

fn load_config(env: &Env) -> ServerConfig {
    let Ok(source) = env.var("SWEEPER_CONFIG") else {
        return ServerConfig::default();
    };
    ServerConfig::from_toml(&source.to_string()).unwrap_or_else(|err| {
        log::error!("Ignoring SWEEPER_CONFIG: {}", err);
        ServerConfig::default()
    })
}

#[event(start)]
fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Error initializing logger");
    log::info!("Worker started");
}

#[event(fetch)]
async fn fetch(mut req: Request, env: Env, _ctx: Context) -> worker::Result<Response> {
    let service = SERVICE.get_or_init(|| GameService::new(load_config(&env), js_random_seed()));

    let method = match req.method() {
        worker::Method::Get => Method::Get,
        worker::Method::Post => Method::Post,
        worker::Method::Delete => Method::Delete,
        _ => Method::Other,
    };
    let path = req.path();
    let cookie = req.headers().get("Cookie")?;
    let body = req.text().await?;

    let reply = service.handle(
        &HttpRequest {
            method,
            path: &path,
            cookie: cookie.as_deref(),
            body: &body,
        },
        web_time::Instant::now(),
    );

    let mut headers = Headers::new();
    headers.set("Content-Type", "application/json")?;
    if let Some(cookie) = &reply.set_cookie {
        headers.set("Set-Cookie", cookie)?;
    }
    Ok(Response::ok(reply.body)?
        .with_status(reply.status)
        .with_headers(headers))
}

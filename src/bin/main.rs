#[cfg(not(target_arch = "wasm32"))]
mod native {
    extern crate forum;

    use actix_web::{web, App, HttpServer, HttpRequest, HttpResponse};
    use forum::config::Config;
    use forum::core::db::MemoryKv;
    use forum::handlers::{handle_request, Forum};
    use tracing_subscriber::EnvFilter;

    mod adapter {
        use actix_web::HttpRequest;
        use spin_sdk::http::{Request, Method};

        pub fn actix_to_spin_request(
            req: &HttpRequest,
            body: actix_web::web::Bytes,
        ) -> anyhow::Result<Request> {
            let method = match req.method().as_str() {
                "GET" => Method::Get,
                "POST" => Method::Post,
                "PUT" => Method::Put,
                "DELETE" => Method::Delete,
                "HEAD" => Method::Head,
                "OPTIONS" => Method::Options,
                "PATCH" => Method::Patch,
                other => anyhow::bail!("unsupported method {}", other),
            };

            let uri = req.uri().to_string();

            let mut builder = Request::builder();
            builder.method(method);
            builder.uri(uri);
            for (name, value) in req.headers() {
                if let Ok(val_str) = value.to_str() {
                    builder.header(name.as_str(), val_str);
                }
            }

            Ok(builder.body(body.to_vec()).build())
        }

        pub fn spin_to_actix_response(spin_resp: spin_sdk::http::Response) -> actix_web::HttpResponse {
            let status = *spin_resp.status();
            let body = spin_resp.body().to_vec();

            actix_web::HttpResponse::build(
                actix_web::http::StatusCode::from_u16(status)
                    .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
            )
            .content_type("application/json")
            .body(body)
        }
    }

    struct AppState {
        kv: MemoryKv,
        config: Config,
    }

    pub async fn run() -> anyhow::Result<()> {
        let config = Config::from_env()?;

        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(&config.log_filter))
            .init();

        let bind_addr = config.bind_addr.clone();
        let state = web::Data::new(AppState {
            kv: MemoryKv::new(),
            config,
        });

        tracing::info!(%bind_addr, "forum server listening");

        HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .default_service(web::route().to(handle_all))
        })
        .bind(bind_addr)?
        .run()
        .await?;

        Ok(())
    }

    async fn handle_all(state: web::Data<AppState>, req: HttpRequest, body: web::Bytes) -> HttpResponse {
        let spin_req = match adapter::actix_to_spin_request(&req, body) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "could not adapt request");
                return HttpResponse::BadRequest()
                    .json(serde_json::json!({"error": "Invalid request"}));
            }
        };

        let forum = Forum::new(&state.kv, &state.config);
        adapter::spin_to_actix_response(handle_request(&forum, spin_req))
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    native::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {}

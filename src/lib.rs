pub mod auth;
pub mod comments;
pub mod config;
pub mod core;
pub mod engagement;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod posts;
pub mod store;
pub mod users;

#[cfg(target_arch = "wasm32")]
use spin_sdk::{
    http::{IntoResponse, Request},
    http_component,
};

#[cfg(target_arch = "wasm32")]
#[http_component]
fn handle(req: Request) -> anyhow::Result<impl IntoResponse> {
    let kv = crate::core::db::SpinKv::open_default()?;
    let config = config::Config::from_env()?;
    Ok(handlers::handle_request(&handlers::Forum::new(&kv, &config), req))
}

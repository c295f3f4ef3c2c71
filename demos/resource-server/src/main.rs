use axum::{middleware::from_fn_with_state, response::IntoResponse, routing::get, Extension, Json};
use tracing_subscriber::EnvFilter;
use userinfo_auth::{
    axum::authentication_middleware, AuthenticationContext, ResolverConfig, UserInfoTokenResolver,
};

const DEFAULT_USER_INFO_URI: &str = "http://localhost:5000/uaa/users/current";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let user_info_uri =
        std::env::var("USER_INFO_URI").unwrap_or_else(|_| DEFAULT_USER_INFO_URI.to_string());
    let client_id = std::env::var("CLIENT_ID").unwrap_or_else(|_| "statistics-service".to_string());

    let config = ResolverConfig::builder()
        .user_info_uri(user_info_uri.parse().unwrap())
        .client_id(client_id)
        .build();
    let resolver = UserInfoTokenResolver::new(&config).unwrap();

    let app = axum::Router::new()
        .route("/whoami", get(whoami))
        .layer(from_fn_with_state(
            resolver,
            authentication_middleware::<UserInfoTokenResolver>,
        ));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000")
        .await
        .unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}

async fn whoami(Extension(auth): Extension<AuthenticationContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "principal": auth.principal(),
        "clientId": auth.client_id(),
        "scopes": auth.scopes(),
        "authorities": auth.authorities(),
    }))
}

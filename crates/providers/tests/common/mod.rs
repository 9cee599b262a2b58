use axum::Router;
use tokio::net::TcpListener;

/// Bind a local port first so handlers can be built knowing their own
/// base URL.
pub async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    (listener, base)
}

pub fn serve(listener: TcpListener, app: Router) {
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
}

/// Serve `app` on a fresh local port and return its base URL.
pub async fn spawn(app: Router) -> String {
    let (listener, base) = bind().await;
    serve(listener, app);
    base
}

//! Dashboard asset embedding
//!
//! The dashboard is a static page compiled into the binary; `demodw serve`
//! needs no files on disk next to it.

use axum::{
    body::Body,
    http::{StatusCode, Uri, header},
    response::Response,
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets/ui"]
pub struct Assets;

const CACHE_REVALIDATE: &str = "public, max-age=0, must-revalidate";

pub async fn serve_assets(uri: Uri) -> Response<Body> {
    let path = uri.path().trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };

    if let Some(file) = Assets::get(path) {
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        return asset_response(mime.as_ref(), file.data.into_owned());
    }

    // Unknown paths fall back to the dashboard page
    if let Some(file) = Assets::get("index.html") {
        return asset_response("text/html", file.data.into_owned());
    }

    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Body::from("404 Not Found"))
        .unwrap_or_default()
}

fn asset_response(mime: &str, data: Vec<u8>) -> Response<Body> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime)
        .header(header::CACHE_CONTROL, CACHE_REVALIDATE)
        .body(Body::from(data))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_page_is_embedded() {
        let file = Assets::get("index.html").expect("index.html embedded");
        let html = String::from_utf8(file.data.into_owned()).unwrap();
        assert!(html.contains("<html"));
    }

    #[tokio::test]
    async fn test_unknown_path_falls_back_to_dashboard() {
        let response = serve_assets("/does-not-exist".parse().unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE].to_str().unwrap(),
            "text/html"
        );
    }
}

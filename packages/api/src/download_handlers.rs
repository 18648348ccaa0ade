// ABOUTME: HTTP request handlers for purchased e-book downloads
// ABOUTME: Streams an asset only for a currently valid token; everything else is redirected

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Redirect, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{error, info};

use lispbook_core::{is_well_formed_token, AssetFormat};

use crate::error::{ApiResult, AppError};
use crate::state::AppState;

/// Informational page for unknown or expired tokens
pub const INVALID_DOWNLOAD_PAGE: &str = "/invalid";

fn invalid_download() -> Response {
    Redirect::to(INVALID_DOWNLOAD_PAGE).into_response()
}

pub async fn download(
    State(state): State<AppState>,
    Path((token, format)): Path<(String, String)>,
    request: Request,
) -> ApiResult<Response> {
    let Ok(format) = format.parse::<AssetFormat>() else {
        info!(format = %format, "Download requested in unknown format");
        return Ok(invalid_download());
    };

    // Malformed tokens cannot be in the ledger; skip the read
    if !is_well_formed_token(&token) || !state.validator.is_valid_now(&token).await? {
        info!(format = %format, audit = true, "Rejected download with invalid token");
        return Ok(invalid_download());
    }

    let path = state.assets_dir.join(format.file_name());
    let response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    if response.status() == StatusCode::NOT_FOUND {
        error!(path = %path.display(), "Download asset missing from assets directory");
        return Err(AppError::not_found());
    }

    let disposition = format!("attachment; filename=\"{}\"", format.file_name());
    let (mut parts, body) = response.into_parts();
    parts
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static(format.media_type()));
    parts.headers.insert(
        CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition).map_err(AppError::internal)?,
    );

    info!(format = %format, "Serving purchased download");
    Ok(Response::from_parts(parts, Body::new(body)))
}

use axum::{extract::{Multipart, Path, State}, response::IntoResponse, Json};
use image::ImageFormat;
use tracing::info;

use crate::adapters::http::error::ApiResult;
use crate::adapters::http::state::HttpState;
use crate::application::dto::HaircareLookupResponse;
use crate::domain::{
    errors::DomainError,
    haircare,
    session::SessionSettings,
    threshold::ConfidenceThreshold,
};

pub async fn get_config(State(st): State<HttpState>) -> impl IntoResponse {
    Json(st.detection.config())
}

/// Multipart upload: `file` (jpg/jpeg/png) and optional `confidence` percent.
pub async fn detect_upload(State(st): State<HttpState>, mut multipart: Multipart) -> ApiResult<impl IntoResponse> {
    let mut session = SessionSettings::default();
    let mut file: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DomainError::InvalidInput(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| DomainError::InvalidInput(format!("cannot read upload: {e}")))?;
                file = Some(bytes.to_vec());
            }
            "confidence" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| DomainError::InvalidInput(format!("cannot read confidence: {e}")))?;
                session = session.with_upload_confidence(ConfidenceThreshold::parse(&raw)?);
            }
            _ => {}
        }
    }

    let bytes = file.ok_or_else(|| DomainError::InvalidInput("missing `file` field".into()))?;
    ensure_supported_format(&bytes)?;

    let response = st.detection.analyze_upload(bytes, session.upload_confidence).await?;
    info!(
        "Upload analysed at {}%: {} boxes, labels {:?}",
        response.confidence, response.detection_count, response.labels
    );
    Ok(Json(response))
}

pub async fn list_profiles() -> impl IntoResponse {
    Json(haircare::profiles())
}

/// Never 404s: unknown labels come back with the fallback text.
pub async fn lookup_haircare(Path(label): Path<String>) -> impl IntoResponse {
    Json(HaircareLookupResponse::for_label(&label))
}

fn ensure_supported_format(bytes: &[u8]) -> Result<(), DomainError> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg | ImageFormat::Png) => Ok(()),
        Ok(other) => Err(DomainError::InvalidInput(format!("unsupported image format {other:?}, use jpg or png"))),
        Err(_) => Err(DomainError::InvalidInput("unrecognised image data, use jpg or png".into())),
    }
}

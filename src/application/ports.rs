use async_trait::async_trait;
use image::RgbImage;

use crate::domain::{
    detection::{ClassNames, Detection},
    errors::DomainResult,
    model::ModelId,
};

/// Detection provider. Implementations report only regions scoring at or
/// above `confidence`, which is a fraction in [0.10, 1.00].
pub trait DetectorPort: Send + Sync {
    fn predict(&self, image: &RgbImage, confidence: f32) -> DomainResult<Vec<Detection>>;
    fn names(&self) -> &ClassNames;
}

#[async_trait]
pub trait ModelCatalogPort: Send + Sync {
    async fn validate_model(&self, model: &ModelId) -> DomainResult<()>;
}

use async_trait::async_trait;

use super::types::{TranslationRequest, TranslationResponse};
use crate::error::NmtResult;

#[async_trait]
pub trait NmtTranslator: Send + Sync {
    async fn initialize(&self) -> NmtResult<()>;
    async fn translate(&self, request: TranslationRequest) -> NmtResult<TranslationResponse>;
    async fn finalize(&self) -> NmtResult<()>;
}

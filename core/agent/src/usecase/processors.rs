//! 前処理・後処理のフック
//!
//! Preprocessor はハンドラに渡す前のメッセージを変換し、Postprocessor は確定した
//! Response を変換する。どちらも登録順に適用され、失敗は Dispatcher がエラー応答にする。
//! クロージャもそのまま登録できる。

use crate::domain::{Context, Response};

/// 前処理・後処理の失敗
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct ProcessorError(pub String);

impl ProcessorError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

pub trait Preprocessor: Send + Sync {
    fn preprocess(&self, text: String, context: &Context) -> Result<String, ProcessorError>;
}

pub trait Postprocessor: Send + Sync {
    fn postprocess(&self, response: Response, context: &Context)
        -> Result<Response, ProcessorError>;
}

impl<F> Preprocessor for F
where
    F: Fn(String, &Context) -> Result<String, ProcessorError> + Send + Sync,
{
    fn preprocess(&self, text: String, context: &Context) -> Result<String, ProcessorError> {
        self(text, context)
    }
}

impl<F> Postprocessor for F
where
    F: Fn(Response, &Context) -> Result<Response, ProcessorError> + Send + Sync,
{
    fn postprocess(
        &self,
        response: Response,
        context: &Context,
    ) -> Result<Response, ProcessorError> {
        self(response, context)
    }
}

/// 前後の空白を落とす（既定の前処理）
#[derive(Debug, Clone, Copy, Default)]
pub struct Trim;

impl Preprocessor for Trim {
    fn preprocess(&self, text: String, _context: &Context) -> Result<String, ProcessorError> {
        Ok(text.trim().to_string())
    }
}

//! Fake Completion Client - 用于测试的补全客户端
//!
//! 不调用真实模型，按注入的规则应答并记录所有请求

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use crate::application::ports::{CompletionError, CompletionRequest, TextCompletionPort};

type Responder = dyn Fn(&CompletionRequest) -> Result<String, CompletionError> + Send + Sync;

pub struct FakeCompletionClient {
    responder: Box<Responder>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompletionClient {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String, CompletionError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 对所有请求返回同一段文本
    pub fn fixed(answer: impl Into<String>) -> Self {
        let answer = answer.into();
        Self::new(move |_| Ok(answer.clone()))
    }

    /// 已收到的请求（按到达顺序）
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl TextCompletionPort for FakeCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "FakeCompletionClient: answering"
        );
        let answer = (self.responder)(&request);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        answer
    }
}

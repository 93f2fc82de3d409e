//! Fake Image Client - 用于测试的出图客户端
//!
//! 默认行为：提交返回 `task-{n}`，首次查询即成功，结果为 `https://img.example/{task_id}.png`

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::{Mutex, PoisonError};

use crate::application::ports::{
    ImageGenerationError, ImageGenerationPort, ImageTask, ImageTaskStatus,
};

/// (prompt, 第几次提交，从 0 开始)
type SubmitFn = dyn Fn(&str, usize) -> Result<String, ImageGenerationError> + Send + Sync;
/// (task_id, 该任务第几次查询，从 0 开始)
type TaskFn = dyn Fn(&str, u32) -> Result<ImageTask, ImageGenerationError> + Send + Sync;

pub struct FakeImageClient {
    submit: Box<SubmitFn>,
    tasks: Box<TaskFn>,
    prompts: Mutex<Vec<String>>,
    polls: DashMap<String, u32>,
}

impl FakeImageClient {
    pub fn new() -> Self {
        Self {
            submit: Box::new(|_, index| Ok(format!("task-{}", index + 1))),
            tasks: Box::new(|task_id, _| {
                let mut task = ImageTask::new(task_id, ImageTaskStatus::Succeeded);
                task.result_urls = vec![format!("https://img.example/{}.png", task_id)];
                Ok(task)
            }),
            prompts: Mutex::new(Vec::new()),
            polls: DashMap::new(),
        }
    }

    pub fn with_submit<F>(mut self, submit: F) -> Self
    where
        F: Fn(&str, usize) -> Result<String, ImageGenerationError> + Send + Sync + 'static,
    {
        self.submit = Box::new(submit);
        self
    }

    pub fn with_tasks<F>(mut self, tasks: F) -> Self
    where
        F: Fn(&str, u32) -> Result<ImageTask, ImageGenerationError> + Send + Sync + 'static,
    {
        self.tasks = Box::new(tasks);
        self
    }

    /// 所有提交过的 Prompt（包括被拒绝的）
    pub fn submitted_prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn poll_count(&self, task_id: &str) -> u32 {
        self.polls.get(task_id).map(|count| *count).unwrap_or(0)
    }
}

impl Default for FakeImageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationPort for FakeImageClient {
    async fn submit(&self, prompt: &str) -> Result<String, ImageGenerationError> {
        let index = {
            let mut prompts = self.prompts.lock().unwrap_or_else(PoisonError::into_inner);
            prompts.push(prompt.to_string());
            prompts.len() - 1
        };
        (self.submit)(prompt, index)
    }

    async fn fetch_task(&self, task_id: &str) -> Result<ImageTask, ImageGenerationError> {
        let poll = {
            let mut count = self.polls.entry(task_id.to_string()).or_insert(0);
            let current = *count;
            *count += 1;
            current
        };
        (self.tasks)(task_id, poll)
    }
}

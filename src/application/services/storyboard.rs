//! Storyboard Generator - 逐场景出图编排
//!
//! 单场景失败被隔离为空字符串哨兵，不会中断其余场景

use futures_util::stream::{self, StreamExt};
use std::sync::Arc;

use super::moderation_retry::ModerationRetryController;
use crate::domain::{Scene, StoryboardResult, VisualSpec};

pub struct StoryboardGenerator {
    controller: Arc<ModerationRetryController>,
    /// 同时进行的场景数，1 表示严格串行
    max_concurrent: usize,
}

impl StoryboardGenerator {
    pub fn new(controller: Arc<ModerationRetryController>, max_concurrent: usize) -> Self {
        Self {
            controller,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// 生成整批分镜
    ///
    /// 返回的 images/prompts 与 scenes 长度相同、按位置对齐，与执行顺序无关
    pub async fn run(
        &self,
        novel_text: &str,
        scenes: &[Scene],
        spec: &VisualSpec,
    ) -> StoryboardResult {
        let total = scenes.len();
        tracing::info!(
            scenes = total,
            novel_chars = novel_text.chars().count(),
            max_concurrent = self.max_concurrent,
            "Storyboard generation started"
        );

        // 先收集成 Vec，流里不留借用闭包，整体 future 才满足 Send
        let jobs: Vec<_> = scenes
            .iter()
            .enumerate()
            .map(|(index, scene)| async move {
                tracing::info!(scene_index = index, total = total, "Generating scene image");
                self.controller.generate_with_retry(index, scene, spec).await
            })
            .collect();

        let panels: Vec<_> = stream::iter(jobs)
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let (images, prompts): (Vec<_>, Vec<_>) = panels
            .into_iter()
            .map(|panel| (panel.image, panel.prompt))
            .unzip();

        let result = StoryboardResult { images, prompts };
        tracing::info!(
            scenes = total,
            failed = result.failed_count(),
            "Storyboard generation finished"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{ImageGenerationError, ImageTask, ImageTaskStatus};
    use crate::application::services::{ImageGenerator, ImageGeneratorConfig};
    use crate::domain::SceneImage;
    use crate::infrastructure::adapters::{FakeCompletionClient, FakeImageClient};
    use std::time::Duration;

    const SAFE_PROMPT: &str = "SAFE VERSION";

    fn generator(images: Arc<FakeImageClient>, max_concurrent: usize) -> StoryboardGenerator {
        let image_generator = ImageGenerator::new(
            images,
            ImageGeneratorConfig {
                poll_interval: Duration::from_secs(5),
                poll_timeout: Duration::from_secs(30),
            },
        );
        let controller = ModerationRetryController::new(
            Arc::new(FakeCompletionClient::fixed(SAFE_PROMPT)),
            image_generator,
            "rewrite-model",
        );
        StoryboardGenerator::new(Arc::new(controller), max_concurrent)
    }

    fn dawn_and_duel() -> Vec<Scene> {
        vec![
            Scene::new(1, "1", "Dawn", "The city gate opens at first light."),
            Scene::new(2, "2", "Duel", "Two swordsmen clash on the bridge."),
        ]
    }

    fn spec() -> VisualSpec {
        VisualSpec::merge("黑发少年", "水墨", &[], &[])
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_scene_rewritten_and_succeeds() {
        let images = Arc::new(FakeImageClient::new().with_submit(|prompt, index| {
            if prompt.contains("Duel") {
                Err(ImageGenerationError::ModerationRejected {
                    rejection_reason: "DataInspectionFailed".to_string(),
                })
            } else {
                Ok(format!("task-{}", index + 1))
            }
        }));

        let result = generator(images, 1).run("novel", &dawn_and_duel(), &spec()).await;

        assert_eq!(
            result.images,
            vec![
                SceneImage::Single("https://img.example/task-1.png".to_string()),
                SceneImage::Single("https://img.example/task-3.png".to_string()),
            ]
        );
        assert_eq!(result.prompts.len(), 2);
        assert!(result.prompts[1].contains("Duel"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_scene_becomes_sentinel_and_batch_completes() {
        let images = Arc::new(FakeImageClient::new().with_tasks(|task_id, _| {
            if task_id == "task-1" {
                Ok(ImageTask::new(task_id, ImageTaskStatus::Running))
            } else {
                let mut task = ImageTask::new(task_id, ImageTaskStatus::Succeeded);
                task.result_urls = vec![format!("https://img.example/{}.png", task_id)];
                Ok(task)
            }
        }));

        let result = generator(images, 1).run("novel", &dawn_and_duel(), &spec()).await;

        assert!(result.images[0].is_failed());
        assert_eq!(result.images[1].first_url(), Some("https://img.example/task-2.png"));
        assert_eq!(result.failed_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_failure_in_many_is_isolated() {
        let images = Arc::new(FakeImageClient::new().with_submit(|prompt, index| {
            if prompt.contains("分镜标题：场景7") {
                Err(ImageGenerationError::ModerationRejected {
                    rejection_reason: "DataInspectionFailed".to_string(),
                })
            } else {
                Ok(format!("task-{}", index + 1))
            }
        }));
        let scenes: Vec<Scene> = (1..=20).map(|n| Scene::new(n, "", "", "...")).collect();

        // 改写后的 Prompt 同样被拒绝
        let images_for_retry = Arc::new(FakeImageClient::new().with_submit(|prompt, index| {
            if prompt.contains("分镜标题：场景7") || prompt == SAFE_PROMPT {
                Err(ImageGenerationError::ModerationRejected {
                    rejection_reason: "DataInspectionFailed".to_string(),
                })
            } else {
                Ok(format!("task-{}", index + 1))
            }
        }));

        let result = generator(images, 1).run("novel", &scenes, &spec()).await;
        assert_eq!(result.images.len(), 20);
        assert_eq!(result.failed_count(), 0);

        let result = generator(images_for_retry, 1).run("novel", &scenes, &spec()).await;
        assert_eq!(result.images.len(), 20);
        assert_eq!(result.prompts.len(), 20);
        assert_eq!(result.failed_count(), 1);
        assert!(result.images[6].is_failed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_parallel_run_keeps_positions() {
        // 越靠前的场景越晚完成
        let images = Arc::new(
            FakeImageClient::new()
                .with_submit(|prompt, _| {
                    (1..=5)
                        .find(|n| prompt.contains(&format!("分镜标题：场景{}\n", n)))
                        .map(|n| format!("task-{}", n))
                        .ok_or_else(|| ImageGenerationError::Upstream("unknown scene".to_string()))
                })
                .with_tasks(|task_id, poll| {
                    let n: u32 = task_id.trim_start_matches("task-").parse().unwrap_or(0);
                    if poll < 6 - n {
                        Ok(ImageTask::new(task_id, ImageTaskStatus::Running))
                    } else {
                        let mut task = ImageTask::new(task_id, ImageTaskStatus::Succeeded);
                        task.result_urls = vec![format!("https://img.example/{}.png", task_id)];
                        Ok(task)
                    }
                }),
        );
        let scenes: Vec<Scene> = (1..=5).map(|n| Scene::new(n, "", "", "...")).collect();

        let result = generator(images, 5).run("novel", &scenes, &spec()).await;

        let urls: Vec<_> = result.images.iter().map(|i| i.first_url().unwrap_or("")).collect();
        assert_eq!(
            urls,
            vec![
                "https://img.example/task-1.png",
                "https://img.example/task-2.png",
                "https://img.example/task-3.png",
                "https://img.example/task-4.png",
                "https://img.example/task-5.png",
            ]
        );
        for (i, prompt) in result.prompts.iter().enumerate() {
            assert!(prompt.contains(&format!("场景{}", i + 1)));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_future_is_send_for_spawned_handlers() {
        let generator = Arc::new(generator(Arc::new(FakeImageClient::new()), 2));
        let scenes = dawn_and_duel();
        let spec = spec();

        let handle = tokio::spawn(async move { generator.run("novel", &scenes, &spec).await });
        let result = handle.await.unwrap();

        assert_eq!(result.images.len(), 2);
        assert_eq!(result.failed_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_scene_list() {
        let result = generator(Arc::new(FakeImageClient::new()), 1)
            .run("novel", &[], &spec())
            .await;
        assert!(result.images.is_empty());
        assert!(result.prompts.is_empty());
    }
}

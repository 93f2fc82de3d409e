//! Memory Layer - In-Memory State Management
//!
//! 项目存储的内存实现，进程重启后数据丢失

mod project_repository;

pub use project_repository::InMemoryProjectRepository;

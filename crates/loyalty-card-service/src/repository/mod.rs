//! 客户记录存储层
//!
//! 提供客户表的数据访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化，不包含业务逻辑
//! - 积分变更在存储内原子完成，避免先读后写的竞态
//! - 唯一约束冲突映射为业务错误
//! - 定义 trait 接口以支持 mock 测试和内存实现

mod customer_repo;
mod memory_repo;
mod traits;

pub use customer_repo::CustomerRepository;
pub use memory_repo::InMemoryCustomerRepository;
pub use traits::*;

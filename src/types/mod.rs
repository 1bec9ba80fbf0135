//! # 通用类型

pub mod pagination;

pub use pagination::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, Page, PaginationInfo, PaginationParams};

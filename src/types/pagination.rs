use serde::Serialize;

/// 未指定或越界时的每页条数
pub const DEFAULT_PAGE_LIMIT: u64 = 50;
/// 每页条数上限
pub const MAX_PAGE_LIMIT: u64 = 100;

/// 分页参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    /// 当前页码（>= 1）
    pub page: u64,
    /// 每页条数（1..=100）
    pub limit: u64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl PaginationParams {
    /// 根据可选参数创建分页配置
    ///
    /// 页码小于 1 视为 1；条数不在 `1..=100` 内时使用默认值 50
    #[must_use]
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        let page = page.filter(|page| *page >= 1).unwrap_or(1);
        let limit = limit
            .filter(|limit| (1..=MAX_PAGE_LIMIT).contains(limit))
            .unwrap_or(DEFAULT_PAGE_LIMIT);
        Self { page, limit }
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

/// 标准分页信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

impl PaginationInfo {
    /// 根据总数和分页参数计算分页信息
    #[must_use]
    pub const fn build(total: u64, params: PaginationParams) -> Self {
        let pages = if total == 0 {
            0
        } else {
            total.div_ceil(params.limit)
        };
        Self {
            page: params.page,
            limit: params.limit,
            total,
            pages,
        }
    }
}

/// 一页数据
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

//! 路由过滤：每次都从完整路由序列重新计算，不在上一次结果上叠加。

use crate::models::RouteConfig;

/// 去掉首尾空白并转小写
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// path 或 method 包含查询串（大小写不敏感）的路由；空查询返回全部
pub fn filter_routes<'a>(routes: &'a [RouteConfig], query: &str) -> Vec<&'a RouteConfig> {
    let q = normalize_query(query);
    if q.is_empty() {
        return routes.iter().collect();
    }
    routes
        .iter()
        .filter(|r| r.path.to_lowercase().contains(&q) || r.method.to_lowercase().contains(&q))
        .collect()
}

/// 过滤控制器：加载成功后持有完整路由序列
#[derive(Debug, Clone, Default)]
pub struct RouteFilter {
    all: Vec<RouteConfig>,
    query: String,
}

impl RouteFilter {
    pub fn new(all: Vec<RouteConfig>) -> Self {
        Self {
            all,
            query: String::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn all(&self) -> &[RouteConfig] {
        &self.all
    }

    /// 更新查询串，返回需要重新渲染的路由
    pub fn apply(&mut self, query: &str) -> Vec<&RouteConfig> {
        self.query = query.to_string();
        filter_routes(&self.all, &self.query)
    }

    pub fn visible(&self) -> Vec<&RouteConfig> {
        filter_routes(&self.all, &self.query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn route(path: &str, method: &str) -> RouteConfig {
        RouteConfig {
            path: path.to_string(),
            method: method.to_string(),
            backends: vec![],
            plugins: vec![],
            aggregate: String::new(),
            transform: String::new(),
        }
    }

    fn sample() -> Vec<RouteConfig> {
        vec![
            route("/users", "GET"),
            route("/users", "POST"),
            route("/Orders/{id}", "delete"),
        ]
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  PoSt \n"), "post");
        assert_eq!(normalize_query("   "), "");
    }

    #[test]
    fn test_empty_query_is_identity() {
        let routes = sample();
        let out = filter_routes(&routes, "");
        assert_eq!(out.len(), 3);
        assert!(out.iter().zip(routes.iter()).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn test_filter_by_method() {
        let routes = sample();
        let out = filter_routes(&routes, "post");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].method, "POST");
    }

    #[test]
    fn test_filter_by_path_case_insensitive() {
        let routes = sample();
        let out = filter_routes(&routes, " ORDERS ");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].method, "delete");
    }

    #[test]
    fn test_filter_no_match() {
        let routes = sample();
        assert!(filter_routes(&routes, "postx").is_empty());
    }

    #[test]
    fn test_duplicates_kept() {
        let routes = vec![route("/a", "GET"), route("/a", "GET")];
        assert_eq!(filter_routes(&routes, "/a").len(), 2);
    }

    #[test]
    fn test_controller_recomputes_from_full_set() {
        let mut filter = RouteFilter::new(sample());
        assert_eq!(filter.apply("zzz").len(), 0);
        // 不是在上一次空结果上继续过滤
        assert_eq!(filter.apply("users").len(), 2);
        assert_eq!(filter.apply("").len(), 3);
        assert_eq!(filter.query(), "");
    }

    proptest! {
        #[test]
        fn prop_filter_matches_definition(
            paths in proptest::collection::vec("[a-zA-Z/]{0,6}", 0..6),
            query in "[ a-zA-Z/]{0,4}",
        ) {
            let routes: Vec<RouteConfig> = paths
                .iter()
                .enumerate()
                .map(|(i, p)| route(p, if i % 2 == 0 { "GET" } else { "Post" }))
                .collect();
            let q = query.trim().to_lowercase();
            let expected: Vec<&RouteConfig> = routes
                .iter()
                .filter(|r| r.path.to_lowercase().contains(&q) || r.method.to_lowercase().contains(&q))
                .collect();
            prop_assert_eq!(filter_routes(&routes, &query), expected);
        }
    }
}

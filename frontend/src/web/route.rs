//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑，不依赖 DOM 或 web_sys。
//! 定义了应用的所有路由及其访问规则。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 落地页 (默认路由)
    #[default]
    Landing,
    Login,
    Register,
    /// 课程首页 (需要认证)
    Dashboard,
    /// 课程详情
    Course(String),
    /// 分类课程列表
    Sector(String),
    Cart,
    /// 个人中心
    Profile,
    /// 页面未找到；`/checkout` 同样落在这里
    NotFound,
}

/// 拆出单个非空路径参数，允许末尾斜杠
fn single_param(rest: &str) -> Option<&str> {
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    (!rest.is_empty() && !rest.contains('/')).then_some(rest)
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            other => other,
        };

        match trimmed {
            "/" => return Self::Landing,
            "/login" => return Self::Login,
            "/register" => return Self::Register,
            "/dashboard" => return Self::Dashboard,
            "/cart" => return Self::Cart,
            "/profile" => return Self::Profile,
            _ => {}
        }

        if let Some(id) = path.strip_prefix("/course/").and_then(single_param) {
            return Self::Course(id.to_string());
        }
        if let Some(id) = path.strip_prefix("/sector/").and_then(single_param) {
            return Self::Sector(id.to_string());
        }
        Self::NotFound
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Course(id) => format!("/course/{}", id),
            Self::Sector(id) => format!("/sector/{}", id),
            Self::Cart => "/cart".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard | Self::Course(_) | Self::Sector(_) | Self::Cart | Self::Profile
        )
    }

    /// 定义已认证用户是否应该离开此路由（登录 / 注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_static_and_param_routes() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Landing);
        assert_eq!(AppRoute::from_path(""), AppRoute::Landing);
        assert_eq!(AppRoute::from_path("/login/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/cart"), AppRoute::Cart);
        assert_eq!(
            AppRoute::from_path("/course/1b2c-33"),
            AppRoute::Course("1b2c-33".into())
        );
        assert_eq!(
            AppRoute::from_path("/sector/abc/"),
            AppRoute::Sector("abc".into())
        );
    }

    #[test]
    fn unknown_paths_are_not_found() {
        for path in ["/checkout", "/course", "/course/", "/course/a/b", "/nope"] {
            assert_eq!(AppRoute::from_path(path), AppRoute::NotFound, "{}", path);
        }
    }

    #[test]
    fn paths_round_trip() {
        let routes = [
            AppRoute::Landing,
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::Dashboard,
            AppRoute::Course("c-1".into()),
            AppRoute::Sector("s-1".into()),
            AppRoute::Cart,
            AppRoute::Profile,
            AppRoute::NotFound,
        ];
        for route in routes {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn protected_routes() {
        assert!(!AppRoute::Landing.requires_auth());
        assert!(!AppRoute::Login.requires_auth());
        assert!(!AppRoute::Register.requires_auth());
        assert!(!AppRoute::NotFound.requires_auth());
        assert!(AppRoute::Dashboard.requires_auth());
        assert!(AppRoute::Course("x".into()).requires_auth());
        assert!(AppRoute::Sector("x".into()).requires_auth());
        assert!(AppRoute::Cart.requires_auth());
        assert!(AppRoute::Profile.requires_auth());

        assert!(AppRoute::Register.should_redirect_when_authenticated());
        assert!(!AppRoute::Landing.should_redirect_when_authenticated());
    }
}

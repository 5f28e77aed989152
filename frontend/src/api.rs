//! 远端课程 / 用户服务客户端
//!
//! 每个方法只发出一次 HTTP 请求（空购物车除外，直接返回空明细），
//! 无重试、无超时、无分页。失败统一映射为 [`AppError`]。

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::web::{HttpClient, HttpRequest};
use prolearn_shared::protocol::*;
use prolearn_shared::{
    AUTH_SCHEME, AuthResponse, CartResponse, Course, CourseDetail, HEADER_AUTHORIZATION, Profile,
    Sector, SectorListing,
};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone)]
pub struct StorefrontApi<H> {
    client: H,
    config: AppConfig,
}

impl<H: HttpClient> StorefrontApi<H> {
    pub fn new(client: H, config: AppConfig) -> Self {
        Self { client, config }
    }

    /// 发送强类型请求并获取解析后的响应
    pub async fn send<R: ApiRequest>(&self, req: &R, token: Option<&str>) -> AppResult<R::Response> {
        let endpoint = req.endpoint();

        if R::REQUIRES_AUTH && token.is_none() {
            return Err(AppError::unauthorized("no session token").in_op_with("api.send", endpoint));
        }

        // 1. 构造请求
        let mut request = HttpRequest::new(self.config.url(&endpoint), R::METHOD)
            .header("Accept", "application/json");

        if let Some(token) = token {
            request = request.header(HEADER_AUTHORIZATION, &format!("{} {}", AUTH_SCHEME, token));
        }

        if R::METHOD.has_body() {
            let body = serde_json::to_string(req)
                .map_err(|e| AppError::from(e).in_op_with("api.serialize", endpoint.clone()))?;
            request = request.header("Content-Type", "application/json").body(body);
        }

        // 2. 发送
        let response = self
            .client
            .send(request)
            .await
            .map_err(|e| AppError::from(e).in_op_with("api.fetch", endpoint.clone()))?;

        // 3. 检查状态码
        if !response.ok() {
            return Err(AppError::from_status(response.status, &response.body)
                .in_op_with("api.fetch", endpoint));
        }

        // 4. 反序列化响应
        response
            .json::<R::Response>()
            .map_err(|e| AppError::from(e).in_op_with("api.deserialize", endpoint))
    }

    // =========================================================
    // 课程服务
    // =========================================================

    /// 首页：按板块分组的精选课程
    pub async fn homepage(&self) -> AppResult<Vec<Sector>> {
        self.send(&HomepageRequest, None).await
    }

    pub async fn course_detail(&self, course_uuid: &str) -> AppResult<CourseDetail> {
        let req = CourseDetailRequest {
            course_uuid: course_uuid.to_string(),
        };
        self.send(&req, None).await
    }

    pub async fn sector_courses(&self, sector_uuid: &str) -> AppResult<SectorListing> {
        let req = SectorCoursesRequest {
            sector_uuid: sector_uuid.to_string(),
        };
        self.send(&req, None).await
    }

    /// 文本搜索，空白关键字在本地拦截
    pub async fn search_courses(&self, term: &str) -> AppResult<Vec<Course>> {
        if term.trim().is_empty() {
            return Err(AppError::validation("Enter a search term").in_op("api.search"));
        }
        let req = SearchCoursesRequest {
            term: term.to_string(),
        };
        self.send(&req, None).await
    }

    /// 发表评论；有会话时附带 token
    pub async fn add_comment(
        &self,
        course_uuid: &str,
        message: &str,
        token: Option<&str>,
    ) -> AppResult<()> {
        if message.trim().is_empty() {
            return Err(AppError::validation("Comment cannot be empty").in_op("api.add_comment"));
        }
        let req = AddCommentRequest {
            course_uuid: course_uuid.to_string(),
            message: message.trim().to_string(),
        };
        self.send(&req, token).await.map(|_| ())
    }

    /// 将课程 ID 列表解析为价格明细
    pub async fn cart_details(&self, course_ids: &[String]) -> AppResult<CartResponse> {
        if course_ids.is_empty() {
            return Ok(CartResponse::empty());
        }
        let req = CartDetailRequest {
            cart: course_ids.to_vec(),
        };
        self.send(&req, None).await
    }

    pub async fn study_course(&self, course_uuid: &str, token: &str) -> AppResult<CourseDetail> {
        let req = StudyCourseRequest {
            course_uuid: course_uuid.to_string(),
        };
        self.send(&req, Some(token)).await
    }

    // =========================================================
    // 用户服务
    // =========================================================

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> AppResult<AuthResponse> {
        let req = SignupRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.send(&req, None).await
    }

    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthResponse> {
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.send(&req, None).await
    }

    pub async fn profile(&self, token: &str) -> AppResult<Profile> {
        self.send(&ProfileRequest, Some(token)).await
    }

    pub async fn enrolled_courses(&self, token: &str) -> AppResult<Vec<Course>> {
        self.send(&EnrolledCoursesRequest, Some(token)).await
    }

    pub async fn auth_status(&self, token: &str) -> AppResult<bool> {
        self.send(&AuthStatusRequest, Some(token))
            .await
            .map(|status| status.authenticated)
    }

    pub async fn logout(&self, token: &str) -> AppResult<()> {
        self.send(&LogoutRequest {}, Some(token)).await.map(|_| ())
    }
}

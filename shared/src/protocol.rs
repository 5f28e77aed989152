use crate::{AuthResponse, AuthStatus, CartResponse, Course, CourseDetail, Profile, Sector, SectorListing};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// The two remote resource groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Courses,
    Users,
}

impl Service {
    pub fn base_path(&self) -> &'static str {
        match self {
            Service::Courses => "/courses",
            Service::Users => "/users",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// Which remote service handles the request.
    const SERVICE: Service;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the bearer token must be attached.
    const REQUIRES_AUTH: bool = false;

    /// Path below the service root, with a trailing slash (e.g. `detail/<uuid>/`).
    fn path(&self) -> String;

    /// Full path from the API root (e.g. `/courses/detail/<uuid>/`).
    fn endpoint(&self) -> String {
        format!("{}/{}", Self::SERVICE.base_path(), self.path())
    }
}

fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

// =========================================================
// Course service
// =========================================================

/// Homepage: featured courses grouped by sector
#[derive(Debug, Serialize)]
pub struct HomepageRequest;

impl ApiRequest for HomepageRequest {
    type Response = Vec<Sector>;
    const SERVICE: Service = Service::Courses;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        String::new()
    }
}

#[derive(Debug, Serialize)]
pub struct CourseDetailRequest {
    #[serde(skip)]
    pub course_uuid: String,
}

impl ApiRequest for CourseDetailRequest {
    type Response = CourseDetail;
    const SERVICE: Service = Service::Courses;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("detail/{}/", segment(&self.course_uuid))
    }
}

#[derive(Debug, Serialize)]
pub struct SectorCoursesRequest {
    #[serde(skip)]
    pub sector_uuid: String,
}

impl ApiRequest for SectorCoursesRequest {
    type Response = SectorListing;
    const SERVICE: Service = Service::Courses;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("{}/", segment(&self.sector_uuid))
    }
}

#[derive(Debug, Serialize)]
pub struct SearchCoursesRequest {
    #[serde(skip)]
    pub term: String,
}

impl ApiRequest for SearchCoursesRequest {
    type Response = Vec<Course>;
    const SERVICE: Service = Service::Courses;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("search/{}/", segment(self.term.trim()))
    }
}

/// Post a comment on a course. The response body is not inspected.
#[derive(Debug, Serialize)]
pub struct AddCommentRequest {
    #[serde(skip)]
    pub course_uuid: String,
    pub message: String,
}

impl ApiRequest for AddCommentRequest {
    type Response = IgnoredAny;
    const SERVICE: Service = Service::Courses;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("comment/{}/", segment(&self.course_uuid))
    }
}

/// Resolve a list of course ids into priced line items and a total
#[derive(Debug, Serialize)]
pub struct CartDetailRequest {
    pub cart: Vec<String>,
}

impl ApiRequest for CartDetailRequest {
    type Response = CartResponse;
    const SERVICE: Service = Service::Courses;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "cart/".to_string()
    }
}

/// Course content for an enrolled user
#[derive(Debug, Serialize)]
pub struct StudyCourseRequest {
    #[serde(skip)]
    pub course_uuid: String,
}

impl ApiRequest for StudyCourseRequest {
    type Response = CourseDetail;
    const SERVICE: Service = Service::Courses;
    const METHOD: HttpMethod = HttpMethod::Get;
    const REQUIRES_AUTH: bool = true;

    fn path(&self) -> String {
        format!("study/{}/", segment(&self.course_uuid))
    }
}

// =========================================================
// User service
// =========================================================

#[derive(Debug, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for SignupRequest {
    type Response = AuthResponse;
    const SERVICE: Service = Service::Users;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "signup/".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const SERVICE: Service = Service::Users;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "login/".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileRequest;

impl ApiRequest for ProfileRequest {
    type Response = Profile;
    const SERVICE: Service = Service::Users;
    const METHOD: HttpMethod = HttpMethod::Get;
    const REQUIRES_AUTH: bool = true;

    fn path(&self) -> String {
        "profile/".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct EnrolledCoursesRequest;

impl ApiRequest for EnrolledCoursesRequest {
    type Response = Vec<Course>;
    const SERVICE: Service = Service::Users;
    const METHOD: HttpMethod = HttpMethod::Get;
    const REQUIRES_AUTH: bool = true;

    fn path(&self) -> String {
        "my-courses/".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct AuthStatusRequest;

impl ApiRequest for AuthStatusRequest {
    type Response = AuthStatus;
    const SERVICE: Service = Service::Users;
    const METHOD: HttpMethod = HttpMethod::Get;
    const REQUIRES_AUTH: bool = true;

    fn path(&self) -> String {
        "auth-status/".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct LogoutRequest {}

impl ApiRequest for LogoutRequest {
    type Response = IgnoredAny;
    const SERVICE: Service = Service::Users;
    const METHOD: HttpMethod = HttpMethod::Post;
    const REQUIRES_AUTH: bool = true;

    fn path(&self) -> String {
        "logout/".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_remote_layout() {
        assert_eq!(HomepageRequest.endpoint(), "/courses/");
        assert_eq!(
            CourseDetailRequest { course_uuid: "abc".into() }.endpoint(),
            "/courses/detail/abc/"
        );
        assert_eq!(
            SectorCoursesRequest { sector_uuid: "s1".into() }.endpoint(),
            "/courses/s1/"
        );
        assert_eq!(CartDetailRequest { cart: vec![] }.endpoint(), "/courses/cart/");
        assert_eq!(ProfileRequest.endpoint(), "/users/profile/");
        assert_eq!(LogoutRequest {}.endpoint(), "/users/logout/");
    }

    #[test]
    fn search_term_is_trimmed_and_encoded() {
        let req = SearchCoursesRequest { term: "  rust & web ".into() };
        assert_eq!(req.endpoint(), "/courses/search/rust%20%26%20web/");
    }

    #[test]
    fn path_fields_are_not_serialized_into_body() {
        let req = AddCommentRequest {
            course_uuid: "abc".into(),
            message: "hi".into(),
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"message":"hi"}"#);
        assert_eq!(serde_json::to_string(&LogoutRequest {}).unwrap(), "{}");
    }

    #[test]
    fn auth_requirements() {
        assert!(!LoginRequest::REQUIRES_AUTH);
        assert!(ProfileRequest::REQUIRES_AUTH);
        assert!(StudyCourseRequest::REQUIRES_AUTH);
        assert!(HttpMethod::Post.has_body());
        assert!(!HttpMethod::Get.has_body());
    }
}

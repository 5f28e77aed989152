use serde::{Deserialize, Deserializer, Serialize};

pub mod date;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const DEFAULT_API_ROOT: &str = "http://127.0.0.1:8000";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
/// 远端用户服务使用的 token 前缀 (`Authorization: Token <token>`)
pub const AUTH_SCHEME: &str = "Token";

pub const STORAGE_TOKEN_KEY: &str = "token";
pub const STORAGE_API_ROOT_KEY: &str = "prolearn_api_root";
pub const PREFIX_CART: &str = "cart_";
pub const PREFIX_PROFILE_IMAGE: &str = "profile_image_";
pub const PREFIX_PROFILE_NAME: &str = "profile_name_";
pub const PREFIX_PROFILE_HEADLINE: &str = "profile_headline_";
pub const PREFIX_PROFILE_BIO: &str = "profile_bio_";

/// 空购物车的总价
pub const EMPTY_CART_TOTAL: &str = "0.00";

// =========================================================
// 用户模型 (User Models)
// =========================================================

/// 课程作者 / 评论用户
///
/// 课程服务只保证 `first_name` 与 `last_name`，其余字段视版本而定。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, deserialize_with = "de::opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Author {
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.username.clone().unwrap_or_default()
        } else {
            name.to_string()
        }
    }
}

/// 用户服务返回的权威用户资料
///
/// 不同版本的接口字段并不一致，这里全部设为可选并通过 alias 吸收差异。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "de::opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "full_name")]
    pub name: Option<String>,
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
}

impl Profile {
    /// 用于界面展示的名字：name > "first last" > username > email
    pub fn display_name(&self) -> String {
        if let Some(name) = non_empty(&self.name) {
            return name.to_string();
        }
        let joined = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let joined = joined.trim();
        if !joined.is_empty() {
            return joined.to_string();
        }
        self.partition_key().unwrap_or_default().to_string()
    }

    /// 本地存储分区键 (购物车、本地资料)：优先 username，其次 email
    pub fn partition_key(&self) -> Option<&str> {
        non_empty(&self.username).or_else(|| non_empty(&self.email))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// 登录 / 注册响应
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default, alias = "access", alias = "access_token", alias = "key")]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<Profile>,
}

impl AuthResponse {
    /// 仅当服务端真正返回了非空 token 时才视为成功
    pub fn usable_token(&self) -> Option<&str> {
        non_empty(&self.token)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatus {
    #[serde(default, alias = "is_authenticated")]
    pub authenticated: bool,
}

// =========================================================
// 课程模型 (Course Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub course_uuid: String,
    pub title: String,
    #[serde(default)]
    pub student_no: u64,
    #[serde(default)]
    pub author: Author,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub price: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_lectures: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<String>,
}

/// 首页按板块分组的精选课程
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub sector_title: String,
    pub sector_uuid: String,
    #[serde(default)]
    pub featured_course: Vec<Course>,
    #[serde(default)]
    pub sector_image: String,
}

/// 板块课程列表
///
/// 服务端出现过三种形态：`{ data, sector_name, total_students }`、
/// 直接的课程数组、以及 `{ courses }`，统一归并为此结构。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SectorPayload")]
pub struct SectorListing {
    pub courses: Vec<Course>,
    pub sector_name: Option<String>,
    pub total_students: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SectorPayload {
    Plain(Vec<Course>),
    Listing {
        data: Vec<Course>,
        #[serde(default)]
        sector_name: Option<String>,
        #[serde(default)]
        total_students: Option<u64>,
    },
    Wrapped {
        courses: Vec<Course>,
    },
}

impl From<SectorPayload> for SectorListing {
    fn from(payload: SectorPayload) -> Self {
        match payload {
            SectorPayload::Plain(courses) => Self {
                courses,
                ..Default::default()
            },
            SectorPayload::Listing {
                data,
                sector_name,
                total_students,
            } => Self {
                courses: data,
                sector_name,
                total_students,
            },
            SectorPayload::Wrapped { courses } => Self {
                courses,
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub title: String,
    #[serde(default)]
    pub length: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSection {
    pub section_title: String,
    #[serde(default)]
    pub total_duration: String,
    #[serde(default)]
    pub episode: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub user: Author,
    pub message: String,
    #[serde(default)]
    pub created: String,
}

/// 课程详情：基础课程信息 + 章节 + 评论
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub course_section: Vec<CourseSection>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

// =========================================================
// 购物车模型 (Cart Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub title: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub price: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub author: Author,
}

/// 服务端根据课程 ID 列表解析出的价格明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartResponse {
    #[serde(default)]
    pub cart_detail: Vec<CartItem>,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub cart_total: String,
}

impl CartResponse {
    pub fn empty() -> Self {
        Self {
            cart_detail: Vec::new(),
            cart_total: EMPTY_CART_TOTAL.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cart_detail.is_empty()
    }
}

// =========================================================
// 反序列化辅助 (Deserialize helpers)
// =========================================================

mod de {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        Str(String),
        Int(i64),
        Float(f64),
    }

    impl From<StringOrNumber> for String {
        fn from(v: StringOrNumber) -> Self {
            match v {
                StringOrNumber::Str(s) => s,
                StringOrNumber::Int(i) => i.to_string(),
                StringOrNumber::Float(f) => format!("{:.2}", f),
            }
        }
    }

    /// 价格在不同版本中可能是 `"49.99"` 也可能是 `49.99`
    pub fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        StringOrNumber::deserialize(d).map(String::from)
    }

    pub fn opt_string_or_number<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<String>, D::Error> {
        Option::<StringOrNumber>::deserialize(d).map(|v| v.map(String::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn course_json(uuid: &str) -> serde_json::Value {
        json!({
            "course_uuid": uuid,
            "title": "Rust 101",
            "student_no": 42,
            "author": { "id": 7, "username": "ferris", "first_name": "Fer", "last_name": "Ris" },
            "price": "19.99",
            "image_url": "https://img/rust.png"
        })
    }

    #[test]
    fn sector_listing_accepts_data_envelope() {
        let listing: SectorListing = serde_json::from_value(json!({
            "data": [course_json("a")],
            "sector_name": "Programming",
            "total_students": 42
        }))
        .unwrap();
        assert_eq!(listing.courses.len(), 1);
        assert_eq!(listing.sector_name.as_deref(), Some("Programming"));
        assert_eq!(listing.total_students, Some(42));
    }

    #[test]
    fn sector_listing_accepts_bare_array_and_courses_envelope() {
        let plain: SectorListing =
            serde_json::from_value(json!([course_json("a"), course_json("b")])).unwrap();
        assert_eq!(plain.courses.len(), 2);
        assert!(plain.sector_name.is_none());

        let wrapped: SectorListing =
            serde_json::from_value(json!({ "courses": [course_json("c")] })).unwrap();
        assert_eq!(wrapped.courses[0].course_uuid, "c");
    }

    #[test]
    fn numeric_price_and_id_become_strings() {
        let mut raw = course_json("a");
        raw["price"] = json!(25);
        let course: Course = serde_json::from_value(raw).unwrap();
        assert_eq!(course.price, "25");
        assert_eq!(course.author.id.as_deref(), Some("7"));
        assert_eq!(course.author.full_name(), "Fer Ris");
    }

    #[test]
    fn course_detail_flattens_course_fields() {
        let mut raw = course_json("detail-1");
        raw["language"] = json!("English");
        raw["course_section"] = json!([{
            "section_title": "Intro",
            "total_duration": "10m",
            "episode": [{ "title": "Hello", "length": "5m" }]
        }]);
        raw["comments"] = json!([{
            "user": { "first_name": "Ann", "last_name": "Lee" },
            "message": "Great",
            "created": "2024-03-01T10:00:00Z"
        }]);
        let detail: CourseDetail = serde_json::from_value(raw).unwrap();
        assert_eq!(detail.course.course_uuid, "detail-1");
        assert_eq!(detail.course_section[0].episode.len(), 1);
        assert_eq!(detail.comments[0].user.full_name(), "Ann Lee");
    }

    #[test]
    fn profile_display_name_falls_back_through_revisions() {
        let full: Profile = serde_json::from_value(json!({ "full_name": "Alice A" })).unwrap();
        assert_eq!(full.display_name(), "Alice A");

        let split: Profile =
            serde_json::from_value(json!({ "firstName": "Bob", "lastName": "B", "username": "bob" }))
                .unwrap();
        assert_eq!(split.display_name(), "Bob B");

        let bare: Profile = serde_json::from_value(json!({ "email": "c@example.com" })).unwrap();
        assert_eq!(bare.display_name(), "c@example.com");
        assert_eq!(bare.partition_key(), Some("c@example.com"));
    }

    #[test]
    fn auth_response_token_aliases_and_blank_token() {
        let r: AuthResponse = serde_json::from_value(json!({ "access": "abc" })).unwrap();
        assert_eq!(r.usable_token(), Some("abc"));

        let blank: AuthResponse = serde_json::from_value(json!({ "token": "  " })).unwrap();
        assert_eq!(blank.usable_token(), None);

        let none: AuthResponse = serde_json::from_value(json!({ "detail": "bad" })).unwrap();
        assert_eq!(none.usable_token(), None);
    }

    #[test]
    fn empty_cart_response() {
        let empty = CartResponse::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.cart_total, "0.00");
    }
}

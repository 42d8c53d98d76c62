//! 请求 DTO 定义

use std::fmt;
use std::str::FromStr;

use loyalty_card::CustomerFilter;
use loyalty_card::service::dto::RegisterCustomer;
use serde::{Deserialize, Deserializer, de};
use validator::Validate;

/// 管理员登录请求
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50, message = "用户名长度必须在1-50个字符之间"))]
    pub username: String,
    #[validate(length(min = 1, max = 128, message = "密码长度必须在1-128个字符之间"))]
    pub password: String,
}

/// 客户登记请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCustomerRequest {
    #[validate(length(min = 1, max = 100, message = "名字长度必须在1-100个字符之间"))]
    pub name: String,
    #[validate(length(max = 100, message = "姓氏不能超过100个字符"))]
    pub surname: Option<String>,
    #[validate(length(min = 1, max = 32, message = "手机号长度必须在1-32个字符之间"))]
    pub phone: String,
    /// 为空时自动生成 6 位数字卡号
    #[validate(length(max = 32, message = "卡号不能超过32个字符"))]
    pub card_code: Option<String>,
}

impl From<RegisterCustomerRequest> for RegisterCustomer {
    fn from(req: RegisterCustomerRequest) -> Self {
        Self {
            name: req.name,
            surname: req.surname,
            phone: req.phone,
            card_code: req.card_code,
        }
    }
}

/// 客户列表筛选参数
///
/// 空字符串视为未提供
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListCustomersQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub card_code: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(range(min = 0, max = 10, message = "积分筛选值必须在0-10之间"))]
    pub points: Option<i32>,
}

impl From<ListCustomersQuery> for CustomerFilter {
    fn from(query: ListCustomersQuery) -> Self {
        Self {
            name: query.name,
            phone: query.phone,
            card_code: query.card_code,
            points: query.points,
        }
    }
}

/// 手机号或卡号精确查找参数
#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[serde(default)]
    #[validate(length(min = 1, max = 64, message = "查询条件不能为空且不超过64个字符"))]
    pub term: String,
}

fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => FromStr::from_str(s).map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    fn parse_query(query: &str) -> ListCustomersQuery {
        let uri: Uri = format!("/api/admin/customers?{query}").parse().unwrap();
        Query::<ListCustomersQuery>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn test_list_query_blank_fields_are_none() {
        let query = parse_query("name=&phone=%20&cardCode=&points=");
        assert!(query.name.is_none());
        assert!(query.phone.is_none());
        assert!(query.card_code.is_none());
        assert!(query.points.is_none());
    }

    #[test]
    fn test_list_query_points_parsed_and_validated() {
        let query = parse_query("points=10");
        assert_eq!(query.points, Some(10));
        assert!(query.validate().is_ok());

        let query = parse_query("points=11");
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_list_query_non_numeric_points_rejected() {
        let uri: Uri = "/api/admin/customers?points=ten".parse().unwrap();
        assert!(Query::<ListCustomersQuery>::try_from_uri(&uri).is_err());
    }

    #[test]
    fn test_register_request_validation() {
        let ok: RegisterCustomerRequest =
            serde_json::from_str(r#"{"name":"Ana","phone":"555-0101"}"#).unwrap();
        assert!(ok.validate().is_ok());
        assert!(ok.card_code.is_none());

        let missing_name: RegisterCustomerRequest =
            serde_json::from_str(r#"{"name":"","phone":"555-0101"}"#).unwrap();
        assert!(missing_name.validate().is_err());

        let long_code: RegisterCustomerRequest = serde_json::from_str(&format!(
            r#"{{"name":"Ana","phone":"1","cardCode":"{}"}}"#,
            "X".repeat(33)
        ))
        .unwrap();
        assert!(long_code.validate().is_err());
    }

    #[test]
    fn test_register_request_into_command() {
        let req: RegisterCustomerRequest = serde_json::from_str(
            r#"{"name":"Ana","surname":"Silva","phone":"111","cardCode":"ABC"}"#,
        )
        .unwrap();
        let command: RegisterCustomer = req.into();

        assert_eq!(command.surname.as_deref(), Some("Silva"));
        assert_eq!(command.card_code.as_deref(), Some("ABC"));
    }
}

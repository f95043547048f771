use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

use crate::models::User;

// -- 通用响应结构
#[derive(Debug, Serialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

// -- 对外暴露的用户结构，id 以十六进制字符串表示
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub gender: String,
    pub age: u32,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name.clone(),
            gender: user.gender.clone(),
            age: user.age,
        }
    }
}

/// 创建用户请求体
///
/// 客户端传入的 `id` 字段不在此结构中，反序列化时会被直接忽略
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub age: u32,
}

/// 部分更新请求体
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserDto {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
}

impl UpdateUserDto {
    /// 生成 `$set` 需要的字段集合
    ///
    /// 空字符串和 0 与未提供字段等价，不会被写入。
    /// 因此 `{"age": 0}` 无法把年龄改为 0，这是接口的既定行为。
    pub fn changed_fields(&self) -> Document {
        let mut fields = Document::new();

        if let Some(name) = self.name.as_deref().filter(|name| !name.is_empty()) {
            fields.insert("name", name);
        }
        if let Some(gender) = self.gender.as_deref().filter(|gender| !gender.is_empty()) {
            fields.insert("gender", gender);
        }
        if let Some(age) = self.age.filter(|age| *age != 0) {
            fields.insert("age", i64::from(age));
        }

        fields
    }
}

pub fn set_document(fields: Document) -> Document {
    doc! { "$set": fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn update(json: &str) -> UpdateUserDto {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn empty_object_yields_no_fields() {
        assert!(update("{}").changed_fields().is_empty());
    }

    #[test]
    fn zero_values_are_treated_as_absent() {
        let fields = update(r#"{"name":"","gender":"","age":0}"#).changed_fields();
        assert!(fields.is_empty());
    }

    #[test]
    fn only_supplied_non_zero_fields_are_selected() {
        let fields = update(r#"{"age":31,"name":""}"#).changed_fields();
        assert_eq!(fields, doc! { "age": 31_i64 });

        let fields = update(r#"{"name":"Ada","gender":"F"}"#).changed_fields();
        assert_eq!(fields, doc! { "name": "Ada", "gender": "F" });
    }

    #[test]
    fn client_id_is_ignored_on_create() {
        let dto: CreateUserDto =
            serde_json::from_str(r#"{"id":"abc","name":"Ada","age":30}"#).unwrap();
        assert_eq!(dto.name, "Ada");
        assert_eq!(dto.gender, "");
        assert_eq!(dto.age, 30);
    }

    #[test]
    fn user_dto_renders_hex_id() {
        let user = User {
            id: ObjectId::new(),
            name: "Ada".into(),
            gender: "F".into(),
            age: 30,
        };
        let json = serde_json::to_value(UserDto::from(&user)).unwrap();
        assert_eq!(json["id"], user.id.to_hex());
        assert_eq!(json["age"], 30);
    }

    #[test]
    fn set_document_wraps_fields() {
        let set = set_document(doc! { "age": 31_i64 });
        assert_eq!(set, doc! { "$set": { "age": 31_i64 } });
    }
}

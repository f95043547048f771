use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

// -- users 集合中的文档结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub age: u32,
}

/// 将路径参数解析为 ObjectId，格式不合法时返回 `None`
pub fn parse_user_id(raw: &str) -> Option<ObjectId> {
    ObjectId::parse_str(raw).ok()
}

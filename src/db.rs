use std::future::IntoFuture;
use std::time::Duration;

use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    error::ErrorKind,
    options::ClientOptions,
    Client, Collection,
};

use crate::config::Config;
use crate::dtos::set_document;
use crate::models::User;

// -- 启动时连接数据库的最长等待时间
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// -- 数据库层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("document serialization failed: {0}")]
    Serialization(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
                StoreError::Serialization(err.to_string())
            }
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

// -- 为单次数据库调用加上超时限制
pub async fn bounded<T, E, F>(limit: Duration, call: F) -> Result<T, StoreError>
where
    F: IntoFuture<Output = Result<T, E>>,
    E: Into<StoreError>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

/// 用户文档的存取接口
///
/// 处理函数只依赖这个 trait，测试时可以替换为内存实现
#[async_trait]
pub trait UserExt: Send + Sync {
    async fn get_user(&self, user_id: ObjectId) -> Result<Option<User>, StoreError>;

    async fn save_user(&self, user: &User) -> Result<(), StoreError>;

    /// 返回是否有文档被匹配
    async fn update_user(&self, user_id: ObjectId, fields: Document) -> Result<bool, StoreError>;

    /// 返回是否有文档被删除
    async fn delete_user(&self, user_id: ObjectId) -> Result<bool, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct DBClient {
    client: Client,
    users: Collection<User>,
    timeout: Duration,
}

impl DBClient {
    pub fn new(client: Client, config: &Config) -> Self {
        let users = client
            .database(&config.database_name)
            .collection::<User>(&config.collection_name);

        Self {
            client,
            users,
            timeout: config.store_timeout,
        }
    }

    // -- 关闭底层连接
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

// -- 创建数据库客户端并确认连接可用
pub async fn connect(config: &Config) -> Result<DBClient, StoreError> {
    let mut options = bounded(CONNECT_TIMEOUT, ClientOptions::parse(&config.database_url)).await?;
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    options.server_selection_timeout = Some(CONNECT_TIMEOUT);

    let client = Client::with_options(options)?;

    // -- 发送 ping 测试连接
    bounded(
        CONNECT_TIMEOUT,
        client.database("admin").run_command(doc! { "ping": 1 }),
    )
    .await?;

    Ok(DBClient::new(client, config))
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(&self, user_id: ObjectId) -> Result<Option<User>, StoreError> {
        bounded(self.timeout, self.users.find_one(doc! { "_id": user_id })).await
    }

    async fn save_user(&self, user: &User) -> Result<(), StoreError> {
        bounded(self.timeout, self.users.insert_one(user)).await?;
        Ok(())
    }

    async fn update_user(&self, user_id: ObjectId, fields: Document) -> Result<bool, StoreError> {
        let result = bounded(
            self.timeout,
            self.users
                .update_one(doc! { "_id": user_id }, set_document(fields)),
        )
        .await?;

        Ok(result.matched_count > 0)
    }

    async fn delete_user(&self, user_id: ObjectId) -> Result<bool, StoreError> {
        let result = bounded(self.timeout, self.users.delete_one(doc! { "_id": user_id })).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        bounded(
            self.timeout,
            self.client.database("admin").run_command(doc! { "ping": 1 }),
        )
        .await?;
        Ok(())
    }
}

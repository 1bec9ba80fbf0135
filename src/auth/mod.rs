//! # 认证模块
//!
//! API密钥库（明文存储 + 调用计量）与 bcrypt 身份库两种凭证校验实现

pub mod api_key;
pub mod hashed_store;
pub mod traits;
pub mod utils;

pub use api_key::{ApiKeyRecord, ApiKeyVault, generate_api_key};
pub use hashed_store::{BcryptKeyStore, RegisteredKey};
pub use traits::{CredentialValidator, UsageMeter};
pub use utils::AuthUtils;

//! Access policies for the dialogue engine

use crate::domain::repositories::AccessPolicy;
use crate::domain::value_objects::UserId;
use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::Path;
use tokio::sync::RwLock;

/// Lets every user in
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAccess;

#[async_trait]
impl AccessPolicy for OpenAccess {
    async fn is_allowed(&self, _user: UserId) -> bool {
        true
    }
}

/// Allow-list file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowListData {
    #[serde(default)]
    pub whitelist: BTreeSet<UserId>,
    #[serde(default)]
    pub admin_ids: BTreeSet<UserId>,
}

/// Users and admins allowed to use the engine
///
/// Admins are always allowed, whether or not they are on the whitelist.
#[derive(Debug, Default)]
pub struct AllowList {
    data: RwLock<AllowListData>,
}

impl AllowList {
    pub fn new(data: AllowListData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Load from a JSON file; a missing file yields an empty list
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = match tokio::fs::read_to_string(path).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => AllowListData::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self::new(data))
    }

    /// Write the current lists to a JSON file, creating parent directories
    pub async fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&self.snapshot().await)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Returns `false` if the user was already listed
    pub async fn add_user(&self, user: UserId) -> bool {
        let added = self.data.write().await.whitelist.insert(user);
        if added {
            info!("User {} added to the allow-list", user);
        }
        added
    }

    /// Returns `false` if the user was not listed
    pub async fn remove_user(&self, user: UserId) -> bool {
        let removed = self.data.write().await.whitelist.remove(&user);
        if removed {
            info!("User {} removed from the allow-list", user);
        }
        removed
    }

    pub async fn add_admin(&self, user: UserId) -> bool {
        let added = self.data.write().await.admin_ids.insert(user);
        if added {
            info!("User {} added as admin", user);
        }
        added
    }

    pub async fn is_admin(&self, user: UserId) -> bool {
        self.data.read().await.admin_ids.contains(&user)
    }

    pub async fn users(&self) -> Vec<UserId> {
        self.data.read().await.whitelist.iter().copied().collect()
    }

    pub async fn snapshot(&self) -> AllowListData {
        self.data.read().await.clone()
    }
}

#[async_trait]
impl AccessPolicy for AllowList {
    async fn is_allowed(&self, user: UserId) -> bool {
        let data = self.data.read().await;
        data.whitelist.contains(&user) || data.admin_ids.contains(&user)
    }
}

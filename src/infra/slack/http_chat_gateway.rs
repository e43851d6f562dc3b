use crate::domain::ports::ChatGateway;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::error;

/// Slack Web API client. Interactive calls run with a short timeout, the
/// file-transfer step with a longer one; a timed-out call is surfaced to
/// the caller rather than retried, since most methods are not idempotent.
pub struct HttpChatGateway {
    client: Client,
    upload_client: Client,
    base_url: String,
    token: String,
}

const INTERACTIVE_TIMEOUT: Duration = Duration::from_secs(10);
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(30);

impl HttpChatGateway {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(INTERACTIVE_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            upload_client: Client::builder()
                .timeout(TRANSFER_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            base_url,
            token,
        }
    }

    async fn call(&self, method: &str, payload: Value) -> Result<Value, AppError> {
        let res = self.client
            .post(format!("{}/{}", self.base_url, method))
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("{} request failed: {}", method, e);
                error!("{}", msg);
                AppError::Upstream(msg)
            })?;

        let status = res.status();
        let body: Value = res.json().await.map_err(|e| {
            AppError::Upstream(format!("{} returned unreadable body: {}", method, e))
        })?;

        if !status.is_success() || body["ok"].as_bool() != Some(true) {
            let reason = body["error"].as_str().unwrap_or("unknown");
            let msg = format!("{} failed. Status: {}, error: {}", method, status, reason);
            error!("{}", msg);
            return Err(AppError::Upstream(msg));
        }

        Ok(body)
    }
}

#[async_trait]
impl ChatGateway for HttpChatGateway {
    async fn publish_home(&self, user_id: &str, view: Value) -> Result<(), AppError> {
        self.call("views.publish", json!({ "user_id": user_id, "view": view })).await?;
        Ok(())
    }

    async fn open_modal(&self, trigger_id: &str, view: Value) -> Result<(), AppError> {
        self.call("views.open", json!({ "trigger_id": trigger_id, "view": view })).await?;
        Ok(())
    }

    async fn update_modal(&self, view_id: &str, view: Value) -> Result<(), AppError> {
        self.call("views.update", json!({ "view_id": view_id, "view": view })).await?;
        Ok(())
    }

    async fn post_message(&self, channel: &str, text: &str) -> Result<(), AppError> {
        self.call("chat.postMessage", json!({ "channel": channel, "text": text })).await?;
        Ok(())
    }

    async fn post_blocks(&self, channel: &str, text: &str, blocks: Value) -> Result<(), AppError> {
        self.call("chat.postMessage", json!({ "channel": channel, "text": text, "blocks": blocks })).await?;
        Ok(())
    }

    async fn user_name(&self, user_id: &str) -> Result<String, AppError> {
        let body = self.call("users.info", json!({ "user": user_id })).await?;
        let profile = &body["user"]["profile"];
        let name = profile["display_name"].as_str().filter(|n| !n.is_empty())
            .or_else(|| profile["real_name"].as_str())
            .unwrap_or("Unknown");
        Ok(name.to_string())
    }

    async fn usergroup_members(&self, group_id: &str) -> Result<Vec<String>, AppError> {
        let body = self.call("usergroups.users.list", json!({ "usergroup": group_id })).await?;
        let users = body["users"].as_array().cloned().unwrap_or_default();
        Ok(users.into_iter().filter_map(|u| u.as_str().map(str::to_string)).collect())
    }

    async fn list_usergroups(&self) -> Result<Vec<(String, String)>, AppError> {
        let body = self.call("usergroups.list", json!({})).await?;
        let groups = body["usergroups"].as_array().cloned().unwrap_or_default();
        Ok(groups
            .into_iter()
            .filter_map(|g| {
                Some((g["id"].as_str()?.to_string(), g["name"].as_str()?.to_string()))
            })
            .collect())
    }

    async fn list_channels(&self) -> Result<Vec<(String, String)>, AppError> {
        let mut channels = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut payload = json!({
                "types": "public_channel,private_channel",
                "exclude_archived": true,
                "limit": 200,
            });
            if let Some(ref c) = cursor {
                payload["cursor"] = json!(c);
            }
            let body = self.call("conversations.list", payload).await?;

            for channel in body["channels"].as_array().cloned().unwrap_or_default() {
                if let (Some(id), Some(name)) = (channel["id"].as_str(), channel["name"].as_str()) {
                    channels.push((id.to_string(), name.to_string()));
                }
            }

            cursor = body["response_metadata"]["next_cursor"]
                .as_str()
                .filter(|c| !c.is_empty())
                .map(str::to_string);
            if cursor.is_none() {
                break;
            }
        }

        Ok(channels)
    }

    async fn channel_name(&self, channel_id: &str) -> Result<String, AppError> {
        let body = self.call("conversations.info", json!({ "channel": channel_id })).await?;
        body["channel"]["name"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::Upstream("conversations.info returned no channel name".into()))
    }

    async fn upload_file(&self, filename: &str, content: &[u8], channel_id: &str) -> Result<(), AppError> {
        let ticket = self
            .call("files.getUploadURLExternal", json!({ "filename": filename, "length": content.len() }))
            .await?;
        let upload_url = ticket["upload_url"]
            .as_str()
            .ok_or_else(|| AppError::Upstream("upload ticket carried no URL".into()))?;
        let file_id = ticket["file_id"]
            .as_str()
            .ok_or_else(|| AppError::Upstream("upload ticket carried no file id".into()))?;

        let res = self.upload_client
            .post(upload_url)
            .body(content.to_vec())
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("file upload failed: {}", e)))?;
        if !res.status().is_success() {
            return Err(AppError::Upstream(format!("file upload failed. Status: {}", res.status())));
        }

        self.call(
            "files.completeUploadExternal",
            json!({ "files": [{ "id": file_id, "title": filename }], "channel_id": channel_id }),
        )
        .await?;
        Ok(())
    }
}

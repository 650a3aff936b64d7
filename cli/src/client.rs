use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use potluck_core::{Identity, Recipe, RecipeFilter, RecipeForm};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

/// Error body returned by the server on any non-2xx response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "fieldErrors", default)]
    field_errors: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInBody {
    pub token: String,
    pub user: Identity,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePage {
    pub recipes: Vec<Recipe>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

/// Thin JSON client for the Potluck HTTP API.
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(server: &str, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: server.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self
            .authed(builder)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.base))?;
        read(response).await
    }

    pub async fn sign_up(&self, full_name: &str, email: &str, password: &str) -> Result<String> {
        let body = json!({
            "fullName": full_name,
            "email": email,
            "password": password,
            "confirmPassword": password,
        });
        let reply: MessageBody = self
            .send(self.http.post(self.url("/api/auth/signup")).json(&body))
            .await?;
        Ok(reply.message)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInBody> {
        let body = json!({"email": email, "password": password});
        self.send(self.http.post(self.url("/api/auth/signin")).json(&body))
            .await
    }

    pub async fn sign_out(&self) -> Result<()> {
        let _: MessageBody = self
            .send(self.http.post(self.url("/api/auth/signout")))
            .await?;
        Ok(())
    }

    /// The signed-in user, or `None` when the server does not recognize the
    /// session.
    pub async fn current_user(&self) -> Result<Option<Identity>> {
        if self.token.is_none() {
            return Ok(None);
        }
        let response = self
            .authed(self.http.get(self.url("/api/user")))
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", self.base))?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        read(response).await.map(Some)
    }

    /// One page of the explorer. The page number is always sent so the
    /// server answers in paged form.
    pub async fn browse(&self, filter: &RecipeFilter) -> Result<RecipePage> {
        let mut pairs = filter.query_pairs();
        if !pairs.iter().any(|(key, _)| *key == "page") {
            pairs.push(("page", filter.page.to_string()));
        }
        self.send(self.http.get(self.url("/api/recipes")).query(&pairs))
            .await
    }

    pub async fn recipes_by_ids(&self, ids: &[i64]) -> Result<Vec<Recipe>> {
        let ids = ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.send(
            self.http
                .get(self.url("/api/recipes-by-ids"))
                .query(&[("ids", ids)]),
        )
        .await
    }

    pub async fn create_recipe(
        &self,
        form: &RecipeForm,
        image: Option<(String, Vec<u8>)>,
    ) -> Result<Recipe> {
        let mut multipart = Form::new().text("recipe", serde_json::to_string(form)?);
        if let Some((file_name, data)) = image {
            multipart = multipart.part("image", Part::bytes(data).file_name(file_name));
        }
        self.send(self.http.post(self.url("/api/recipes")).multipart(multipart))
            .await
    }
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    tracing::debug!(%status, url = %response.url(), "Response received");
    let bytes = response.bytes().await.context("Failed to read response body")?;

    if status.is_success() {
        return serde_json::from_slice(&bytes)
            .with_context(|| format!("Unexpected response body ({})", status));
    }

    match serde_json::from_slice::<ErrorBody>(&bytes) {
        Ok(body) if body.field_errors.is_empty() => Err(anyhow!("{} ({})", body.message, status)),
        Ok(body) => {
            let details = body
                .field_errors
                .iter()
                .flat_map(|(field, messages)| {
                    messages.iter().map(move |m| format!("  {}: {}", field, m))
                })
                .collect::<Vec<_>>()
                .join("\n");
            Err(anyhow!("{} ({})\n{}", body.message, status, details))
        }
        Err(_) => Err(anyhow!(
            "Request failed ({}): {}",
            status,
            String::from_utf8_lossy(&bytes)
        )),
    }
}

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::cli_utils;
use crate::errors::ErrorResponse;
use crate::recipe::{
    CreateRecipeResponse, GetRecipeResponse, ListRecipesResponse, MessageResponse, RecipeRequest,
};

/// Errors produced by [`RecetasClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response, or the response body was unreadable.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with its error envelope.
    #[error("{0}")]
    Api(String),
    /// The server answered with something other than the expected envelopes.
    #[error("unexpected response ({status}): {body}")]
    Unexpected {
        /// HTTP status of the response.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

/// HTTP client for the recipe API.
pub struct RecetasClient {
    client: Client,
    base_url: String,
}

impl RecetasClient {
    /// Creates a client for the server at `base_url` (for example `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Constructs a full API URL from a path
    pub fn api_url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/api/{}", self.base_url, path)
    }

    /// Lists recipes, optionally filtered by a name substring.
    pub async fn list(&self, search: Option<&str>) -> Result<ListRecipesResponse, ClientError> {
        let mut request = self.client.get(self.api_url("recetas"));
        if let Some(search) = search {
            request = request.query(&[("search", search)]);
        }
        self.handle_response(request.send().await?).await
    }

    /// Fetches one recipe. `id` is sent verbatim so the server does the validation.
    pub async fn get(&self, id: &str) -> Result<GetRecipeResponse, ClientError> {
        let url = self.api_url(&format!("recetas/{}", id));
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Creates a recipe.
    pub async fn create(&self, recipe: &RecipeRequest) -> Result<CreateRecipeResponse, ClientError> {
        let url = self.api_url("recetas");
        let response = self.client.post(&url).json(recipe).send().await?;
        self.handle_response(response).await
    }

    /// Replaces a recipe.
    pub async fn update(
        &self,
        id: &str,
        recipe: &RecipeRequest,
    ) -> Result<MessageResponse, ClientError> {
        let url = self.api_url(&format!("recetas/{}", id));
        let response = self.client.put(&url).json(recipe).send().await?;
        self.handle_response(response).await
    }

    /// Deletes a recipe.
    pub async fn delete(&self, id: &str) -> Result<MessageResponse, ClientError> {
        let url = self.api_url(&format!("recetas/{}", id));
        let response = self.client.delete(&url).send().await?;
        self.handle_response(response).await
    }

    /// Handles HTTP response, deserializing success or surfacing the error envelope
    async fn handle_response<T>(&self, response: Response) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success()
            && let Ok(value) = serde_json::from_str(&body)
        {
            return Ok(value);
        }
        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(envelope) if !envelope.success => Err(ClientError::Api(envelope.error)),
            _ => Err(ClientError::Unexpected {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

/// Execute an HTTP operation and exit on error with formatted message
pub async fn execute_or_exit<T, F, Fut>(operation: F, context: &str) -> T
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, ClientError>>,
{
    match operation().await {
        Ok(result) => result,
        Err(e) => cli_utils::exit_with_error(&format!("{}: {}", context, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::ServerConfig;
    use crate::data_store::InMemoryRecipeStore;
    use crate::errors::{INVALID_ID_MESSAGE, NOT_FOUND_MESSAGE};
    use crate::recipe::{CREATED_MESSAGE, DELETED_MESSAGE, UPDATED_MESSAGE};
    use crate::router::create_app;

    async fn spawn_server() -> String {
        let app = create_app(
            Arc::new(InMemoryRecipeStore::new()),
            &ServerConfig::default(),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn api_url_joins_paths() {
        let client = RecetasClient::new("http://localhost:3000/");
        assert_eq!(
            client.api_url("/recetas/1"),
            "http://localhost:3000/api/recetas/1"
        );
        assert_eq!(client.api_url("recetas"), "http://localhost:3000/api/recetas");
    }

    #[tokio::test]
    async fn full_lifecycle_over_http() {
        let client = RecetasClient::new(spawn_server().await);

        let created = client
            .create(&RecipeRequest::new(
                "Tortilla",
                "huevos,patata",
                "mezclar y freír",
            ))
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.message, CREATED_MESSAGE);

        let listed = client.list(Some("Tort")).await.unwrap();
        assert_eq!(listed.info.count, 1);

        let updated = client
            .update("1", &RecipeRequest::new("Tortilla", "huevos", "freír"))
            .await
            .unwrap();
        assert_eq!(updated.message, UPDATED_MESSAGE);

        let fetched = client.get("1").await.unwrap();
        assert_eq!(fetched.receta.ingredientes, "huevos");

        let deleted = client.delete("1").await.unwrap();
        assert_eq!(deleted.message, DELETED_MESSAGE);

        match client.get("1").await {
            Err(ClientError::Api(message)) => assert_eq!(message, NOT_FOUND_MESSAGE),
            other => panic!("expected not-found envelope, got {:?}", other.map(|r| r.receta)),
        }
    }

    #[tokio::test]
    async fn invalid_id_surfaces_server_message() {
        let client = RecetasClient::new(spawn_server().await);
        match client.delete("abc").await {
            Err(ClientError::Api(message)) => assert_eq!(message, INVALID_ID_MESSAGE),
            other => panic!("expected invalid-id envelope, got {:?}", other.map(|r| r.message)),
        }
    }
}

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum_test::TestServer;
use proptest::prelude::*;

use recetas::{
    CreateRecipeResponse, ErrorResponse, GetRecipeResponse, INVALID_ID_MESSAGE,
    InMemoryRecipeStore, ListRecipesResponse, NOT_FOUND_MESSAGE, RecipeRequest, RecipeStore,
    create_recipe_router,
};

/// Test infrastructure for property testing the recipe API
pub struct ApiTestServer {
    pub server: TestServer,
    pub store: Arc<InMemoryRecipeStore>,
}

impl Default for ApiTestServer {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiTestServer {
    /// Create a new test server with a fresh in-memory store
    pub fn new() -> Self {
        let store = Arc::new(InMemoryRecipeStore::new());
        let app = Router::new().nest("/api", create_recipe_router(store.clone()));
        let server = TestServer::new(app).unwrap();
        Self { server, store }
    }

    async fn create(&self, request: &RecipeRequest) -> CreateRecipeResponse {
        let response = self.server.post("/api/recetas").json(request).await;
        response.assert_status_ok();
        response.json()
    }

    async fn count(&self) -> usize {
        self.store.list(None).await.unwrap().len()
    }
}

/// Property test strategies for generating test data
pub mod strategies {
    use super::*;
    use proptest::collection::hash_set;
    use proptest::string::string_regex;

    /// Non-empty printable text
    pub fn text_strategy() -> impl Strategy<Value = String> {
        string_regex(r"\PC{1,40}").unwrap()
    }

    /// A complete, valid create/update body
    pub fn recipe_request_strategy() -> impl Strategy<Value = RecipeRequest> {
        (text_strategy(), text_strategy(), text_strategy())
            .prop_map(|(n, i, s)| RecipeRequest::new(n, i, s))
    }

    /// Several valid bodies with pairwise distinct names
    pub fn distinct_recipes_strategy(max: usize) -> impl Strategy<Value = Vec<RecipeRequest>> {
        hash_set(text_strategy(), 0..max).prop_flat_map(|names| {
            let names: Vec<String> = names.into_iter().collect();
            let n = names.len();
            proptest::collection::vec((text_strategy(), text_strategy()), n).prop_map(
                move |bodies| {
                    names
                        .iter()
                        .zip(bodies)
                        .map(|(nombre, (i, s))| RecipeRequest::new(nombre.as_str(), i, s))
                        .collect()
                },
            )
        })
    }

    /// Path segments that are not integers
    pub fn non_numeric_id_strategy() -> impl Strategy<Value = String> {
        string_regex(r"[a-zA-Z][a-zA-Z0-9]{0,10}|[0-9]{1,5}[a-zA-Z]{1,3}").unwrap()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn created_recipe_reads_back_unchanged(
        request in strategies::recipe_request_strategy()
    ) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new();

            let created = test_server.create(&request).await;
            prop_assert!(created.success);
            prop_assert!(created.id > 0);

            let response = test_server.server
                .get(&format!("/api/recetas/{}", created.id))
                .await;
            response.assert_status_ok();
            let fetched: GetRecipeResponse = response.json();

            prop_assert_eq!(Some(fetched.receta.nombre), request.nombre);
            prop_assert_eq!(Some(fetched.receta.ingredientes), request.ingredientes);
            prop_assert_eq!(Some(fetched.receta.instrucciones), request.instrucciones);
            Ok(())
        }).unwrap()
    }

    #[test]
    fn reused_name_is_rejected_without_new_row(
        first in strategies::recipe_request_strategy(),
        second in strategies::recipe_request_strategy()
    ) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new();
            test_server.create(&first).await;

            let duplicate = RecipeRequest {
                nombre: first.nombre.clone(),
                ..second
            };
            let response = test_server.server.post("/api/recetas").json(&duplicate).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: ErrorResponse = response.json();
            prop_assert!(!body.success);

            let nombre = first.nombre.clone().unwrap();
            let same_name = test_server
                .store
                .list(Some(&nombre))
                .await
                .unwrap()
                .into_iter()
                .filter(|r| r.nombre == nombre)
                .count();
            prop_assert_eq!(same_name, 1);
            Ok(())
        }).unwrap()
    }

    #[test]
    fn non_numeric_ids_never_mutate(
        id in strategies::non_numeric_id_strategy(),
        request in strategies::recipe_request_strategy()
    ) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new();
            let created = test_server.create(&request).await;
            let path = format!("/api/recetas/{}", id);

            for response in [
                test_server.server.get(&path).await,
                test_server.server.put(&path).json(&request).await,
                test_server.server.delete(&path).await,
            ] {
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: ErrorResponse = response.json();
                prop_assert_eq!(body.error, INVALID_ID_MESSAGE);
            }

            let stored = test_server.store.get(created.id).await.unwrap();
            prop_assert_eq!(Some(stored.nombre), request.nombre);
            prop_assert_eq!(test_server.count().await, 1);
            Ok(())
        }).unwrap()
    }

    #[test]
    fn unknown_numeric_ids_are_not_found(
        id in 2i64..1_000_000,
        request in strategies::recipe_request_strategy()
    ) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new();
            test_server.create(&request).await;
            let path = format!("/api/recetas/{}", id);

            for response in [
                test_server.server.get(&path).await,
                test_server.server.put(&path).json(&request).await,
                test_server.server.delete(&path).await,
            ] {
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: ErrorResponse = response.json();
                prop_assert_eq!(body.error, NOT_FOUND_MESSAGE);
            }
            prop_assert_eq!(test_server.count().await, 1);
            Ok(())
        }).unwrap()
    }

    #[test]
    fn update_then_get_returns_new_values(
        original in strategies::recipe_request_strategy(),
        replacement in strategies::recipe_request_strategy()
    ) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new();
            let created = test_server.create(&original).await;
            let path = format!("/api/recetas/{}", created.id);

            test_server.server.put(&path).json(&replacement).await.assert_status_ok();

            let fetched: GetRecipeResponse = test_server.server.get(&path).await.json();
            prop_assert_eq!(Some(fetched.receta.nombre), replacement.nombre);
            prop_assert_eq!(Some(fetched.receta.ingredientes), replacement.ingredientes);
            prop_assert_eq!(Some(fetched.receta.instrucciones), replacement.instrucciones);
            Ok(())
        }).unwrap()
    }

    #[test]
    fn unfiltered_list_counts_every_recipe(
        requests in strategies::distinct_recipes_strategy(8)
    ) {
        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let test_server = ApiTestServer::new();
            for request in &requests {
                test_server.create(request).await;
            }

            let listed: ListRecipesResponse = test_server.server.get("/api/recetas").await.json();
            prop_assert_eq!(listed.info.count, requests.len());
            prop_assert_eq!(listed.nombre.len(), requests.len());

            let searched: ListRecipesResponse = test_server
                .server
                .get("/api/recetas")
                .add_query_param("search", "")
                .await
                .json();
            prop_assert_eq!(searched.info.count, requests.len());
            Ok(())
        }).unwrap()
    }
}

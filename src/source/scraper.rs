//! Загрузка постов автора с постраничной навигацией

use log::{debug, info, warn};
use reqwest::Client;
use crate::error::{NarratorError, Result};
use crate::source::posts::{sort_posts, Post};

/// Размер страницы API
pub const PAGE_SIZE: usize = 50;

/// Хост по умолчанию
pub const DEFAULT_HOST: &str = "https://kemono.party";

/// Клиент API постов
pub struct PostScraper {
    client: Client,
    base_url: String,
}

impl PostScraper {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn page_url(&self, service: &str, user_id: &str, offset: usize) -> String {
        format!("{}/api/v1/{}/user/{}?o={}", self.base_url, service, user_id, offset)
    }

    async fn fetch_page(&self, service: &str, user_id: &str, offset: usize) -> Result<Vec<Post>> {
        let url = self.page_url(service, user_id, offset);
        debug!("Fetching posts page {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NarratorError::Source(format!("Posts API returned status {} for {}", status, url)));
        }
        Ok(response.json().await?)
    }

    /// Загрузить все посты автора, отсортированные по id.
    ///
    /// Ошибка на любой странице останавливает загрузку, уже полученные посты возвращаются.
    pub async fn fetch_all_posts(&self, service: &str, user_id: &str) -> Vec<Post> {
        let mut all_posts = Vec::new();
        let mut offset = 0;

        loop {
            match self.fetch_page(service, user_id, offset).await {
                Ok(posts) if posts.is_empty() => break,
                Ok(posts) => {
                    all_posts.extend(posts);
                    offset += PAGE_SIZE;
                }
                Err(e) => {
                    warn!("Error fetching posts: {}", e);
                    break;
                }
            }
        }

        info!("Fetched {} posts for user {}", all_posts.len(), user_id);
        sort_posts(&mut all_posts);
        all_posts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn page(ids: std::ops::Range<u32>) -> serde_json::Value {
        serde_json::Value::Array(
            ids.map(|id| serde_json::json!({"id": id.to_string(), "title": format!("Post {}", id), "content": ""}))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_pages_until_empty_and_sorts() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/patreon/user/42"))
            .and(query_param("o", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(50..100)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/patreon/user/42"))
            .and(query_param("o", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(0..50)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/patreon/user/42"))
            .and(query_param("o", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let posts = PostScraper::new(server.uri()).fetch_all_posts("patreon", "42").await;

        assert_eq!(posts.len(), 100);
        assert_eq!(posts[0].id, "0");
        assert_eq!(posts[99].id, "99");
    }

    #[tokio::test]
    async fn test_error_stops_paging() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("o", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(1..3)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("o", "50"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let posts = PostScraper::new(server.uri()).fetch_all_posts("patreon", "7").await;
        assert_eq!(posts.len(), 2);
    }
}

#![allow(dead_code)]
use reqwest::Url;

pub struct TestAppClient {
    url: Url,
    client: reqwest::Client,
}

impl TestAppClient {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    pub async fn health(&self) -> reqwest::Response {
        self.get("/").await
    }

    pub async fn create_post_query(&self, fields: &[(&str, &str)]) -> reqwest::Response {
        let mut url = self.url.join("create-post").unwrap();
        url.query_pairs_mut().extend_pairs(fields);

        self.client.get(url).send().await.unwrap()
    }

    pub async fn create_post_json(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url.join("create-post").unwrap())
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn list_posts(&self) -> reqwest::Response {
        self.get("/get-post").await
    }

    pub async fn get_post(&self, post_id: &str) -> reqwest::Response {
        self.get(&format!("/get-post/{post_id}")).await
    }

    pub async fn delete_post(&self, post_id: &str) -> reqwest::Response {
        self.get(&format!("/delete-post/{post_id}")).await
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url.join(path).unwrap())
            .send()
            .await
            .unwrap()
    }
}

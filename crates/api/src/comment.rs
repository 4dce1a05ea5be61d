use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::JiraClient;

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

impl JiraClient {
    /// Adds a plain-text comment to `issue_key`. The response body is ignored.
    pub async fn comment(&self, issue_key: &str, message: &str) -> Result<()> {
        let payload = serde_json::to_vec(&CommentBody { body: message })?;

        self.post(&format!("issue/{issue_key}/comment"), &payload)
            .await?;

        debug!(issue = %issue_key, "Comment posted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{basic_auth, body_json, body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::{ApiError, JiraClient};

    fn client_for(server: &MockServer) -> JiraClient {
        JiraClient::new(
            format!("{}/rest/api/2/", server.uri()),
            "test_user",
            "test_token",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_comment() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/api/2/issue/ABC-42/comment"))
            .and(basic_auth("test_user", "test_token"))
            .and(header("content-type", "application/json; charset=utf-8"))
            .and(body_string(r#"{"body":"Looks good"}"#))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "10500",
                "body": "Looks good"
            })))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .comment("ABC-42", "Looks good")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_comment_no_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/api/2/issue/ABC-42/comment"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        assert!(client_for(&server).comment("ABC-42", "ok").await.is_ok());
    }

    #[tokio::test]
    async fn test_comment_escapes_message() {
        let messages = [
            "",
            "He said \"ship it\"",
            "naïve café ✓ 日本語",
            "line one\nline two\ttabbed \\ slash",
        ];

        for message in messages {
            let server = MockServer::start().await;

            Mock::given(method("POST"))
                .and(path("/rest/api/2/issue/ABC-1/comment"))
                .and(body_json(serde_json::json!({ "body": message })))
                .respond_with(ResponseTemplate::new(200))
                .expect(1)
                .mount(&server)
                .await;

            client_for(&server).comment("ABC-1", message).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_comment_quotes_on_the_wire() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_string(r#"{"body":"a \"quoted\" word"}"#))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .comment("ABC-1", "a \"quoted\" word")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_comment_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/api/2/issue/ABC-42/comment"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"errorMessages":[],"errors":{"comment":"Comment body can not be empty!"}}"#,
            ))
            .mount(&server)
            .await;

        let err = client_for(&server).comment("ABC-42", "").await.unwrap_err();
        match err {
            ApiError::Status {
                status_code,
                message,
                ..
            } => {
                assert_eq!(status_code, 400);
                assert!(message.contains("Comment body can not be empty"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

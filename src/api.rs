use gloo_net::http::{Request, Response};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{Expense, ExpenseDraft, Flag};

const API_BASE_URL: &str = "http://127.0.0.1:8000";

/// A failed server call. `Connection` means the request never reached
/// the backend; `Server` means the backend answered with an error
/// detail, which is shown to the user verbatim.
#[derive(Clone, PartialEq, Debug, Error)]
pub enum ApiError {
    #[error("Could not connect to the server. Please ensure the backend is running.")]
    Connection,
    #[error("{0}")]
    Server(String),
}

impl ApiError {
    /// The backend rejects an invalid or expired bearer token with this
    /// detail on any protected endpoint. Callers must treat it as a
    /// forced logout no matter which call produced it.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Server(detail) if detail.contains("Could not validate credentials"))
    }
}

/// Extracts the error detail from a failure body. Non-string details
/// are rendered as JSON; a body without a detail falls back to the
/// bare status code.
fn failure_detail(status: u16, body: &Value) -> String {
    match body.get("detail") {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => format!("HTTP error! Status: {status}"),
    }
}

/// Reads a chat- or analysis-style reply, coercing whatever shape the
/// server sent into displayable text.
fn field_text(body: &Value, field: &str) -> String {
    match body.get(field) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => match body {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        },
    }
}

/// Normalizes every response into either a decoded JSON body (`None`
/// for an empty or no-content response) or an `ApiError`.
async fn dispatch(sent: Result<Response, gloo_net::Error>) -> Result<Option<Value>, ApiError> {
    let response = sent.map_err(|_| ApiError::Connection)?;

    if !response.ok() {
        let status = response.status();
        let detail = match response.json::<Value>().await {
            Ok(body) => failure_detail(status, &body),
            Err(_) => format!("HTTP error! Status: {status}"),
        };
        return Err(ApiError::Server(detail));
    }

    if response.status() == 204
        || response.headers().get("content-length").as_deref() == Some("0")
    {
        return Ok(None);
    }

    match response.json::<Value>().await {
        Ok(body) => Ok(Some(body)),
        Err(_) => Ok(None),
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Logs in with the OAuth2 password form and returns the bearer token.
pub async fn login(username: &str, password: &str) -> Result<String, ApiError> {
    let form = serde_urlencoded::to_string([("username", username), ("password", password)])
        .map_err(|err| ApiError::Server(err.to_string()))?;

    let request = Request::post(&format!("{API_BASE_URL}/token"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(form)
        .map_err(|_| ApiError::Connection)?;

    let body = dispatch(request.send().await).await?.unwrap_or(Value::Null);
    serde_json::from_value::<TokenResponse>(body)
        .map(|token| token.access_token)
        .map_err(|_| ApiError::Server("The server returned an unexpected login response.".to_string()))
}

pub async fn register(username: &str, password: &str) -> Result<(), ApiError> {
    let request = Request::post(&format!("{API_BASE_URL}/register"))
        .json(&serde_json::json!({ "username": username, "password": password }))
        .map_err(|_| ApiError::Connection)?;

    dispatch(request.send().await).await?;
    Ok(())
}

/// Fetches the full expense list, in the order the server returns it.
pub async fn list_expenses(token: &str) -> Result<Vec<Expense>, ApiError> {
    let sent = Request::get(&format!("{API_BASE_URL}/expenses"))
        .header("Authorization", &bearer(token))
        .send()
        .await;

    let body = dispatch(sent).await?.unwrap_or_else(|| Value::Array(Vec::new()));
    serde_json::from_value(body)
        .map_err(|_| ApiError::Server("Could not read the expense list.".to_string()))
}

pub async fn add_expense(token: &str, draft: &ExpenseDraft) -> Result<(), ApiError> {
    let request = Request::post(&format!("{API_BASE_URL}/add-expense"))
        .header("Authorization", &bearer(token))
        .json(draft)
        .map_err(|_| ApiError::Connection)?;

    dispatch(request.send().await).await?;
    Ok(())
}

pub async fn edit_expense(token: &str, id: i64, draft: &ExpenseDraft) -> Result<(), ApiError> {
    let request = Request::put(&format!("{API_BASE_URL}/edit-expense/{id}"))
        .header("Authorization", &bearer(token))
        .json(draft)
        .map_err(|_| ApiError::Connection)?;

    dispatch(request.send().await).await?;
    Ok(())
}

pub async fn delete_expense(token: &str, id: i64) -> Result<(), ApiError> {
    let sent = Request::delete(&format!("{API_BASE_URL}/delete-expense/{id}"))
        .header("Authorization", &bearer(token))
        .send()
        .await;

    dispatch(sent).await?;
    Ok(())
}

pub async fn flag_expense(token: &str, id: i64, flag: Flag) -> Result<(), ApiError> {
    let request = Request::post(&format!("{API_BASE_URL}/flag-expense"))
        .header("Authorization", &bearer(token))
        .json(&serde_json::json!({ "id": id, "flag": flag }))
        .map_err(|_| ApiError::Connection)?;

    dispatch(request.send().await).await?;
    Ok(())
}

/// Requests the AI spending analysis. No request body; the server works
/// from the caller's stored expenses.
pub async fn analyze(token: &str) -> Result<String, ApiError> {
    let sent = Request::post(&format!("{API_BASE_URL}/analyze"))
        .header("Authorization", &bearer(token))
        .send()
        .await;

    let body = dispatch(sent).await?.unwrap_or(Value::Null);
    Ok(field_text(&body, "analysis"))
}

/// Sends one chat query. Each call is stateless; the server relates the
/// query to the caller's ledger on its own.
pub async fn chat(token: &str, query: &str) -> Result<String, ApiError> {
    let request = Request::post(&format!("{API_BASE_URL}/chat"))
        .header("Authorization", &bearer(token))
        .json(&serde_json::json!({ "query": query }))
        .map_err(|_| ApiError::Connection)?;

    let body = dispatch(request.send().await).await?.unwrap_or(Value::Null);
    Ok(field_text(&body, "response"))
}

/// Uploads a receipt image as multipart form data and returns how many
/// expenses the server extracted from it. The content type is left to
/// the browser so the multipart boundary is set correctly.
pub async fn process_receipt(
    token: &str,
    file: &web_sys::File,
    description: &str,
) -> Result<u64, ApiError> {
    let form = web_sys::FormData::new().map_err(|_| ApiError::Connection)?;
    let _ = form.append_with_blob_and_filename("file", file, &file.name());
    let _ = form.append_with_str("description", description);

    let request = Request::post(&format!("{API_BASE_URL}/process-receipt"))
        .header("Authorization", &bearer(token))
        .body(form)
        .map_err(|_| ApiError::Connection)?;

    let body = dispatch(request.send().await).await?.unwrap_or(Value::Null);
    Ok(body.get("expenses_added").and_then(Value::as_u64).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::{failure_detail, field_text, ApiError};
    use serde_json::json;

    #[test]
    fn failure_detail_uses_string_detail_verbatim() {
        let body = json!({ "detail": "Expense not found" });
        assert_eq!(failure_detail(404, &body), "Expense not found");
    }

    #[test]
    fn failure_detail_renders_structured_detail_as_json() {
        let body = json!({ "detail": [{ "loc": ["body", "amount"], "msg": "field required" }] });
        let detail = failure_detail(422, &body);
        assert!(detail.contains("field required"));
    }

    #[test]
    fn failure_detail_falls_back_to_status() {
        let body = json!({ "message": "nope" });
        assert_eq!(failure_detail(500, &body), "HTTP error! Status: 500");
    }

    #[test]
    fn field_text_prefers_the_named_field() {
        let body = json!({ "response": "You spent the most on Food." });
        assert_eq!(field_text(&body, "response"), "You spent the most on Food.");
    }

    #[test]
    fn field_text_coerces_non_string_payloads() {
        let body = json!({ "response": { "unexpected": true } });
        assert_eq!(field_text(&body, "response"), r#"{"unexpected":true}"#);

        let bare = json!("plain reply");
        assert_eq!(field_text(&bare, "response"), "plain reply");

        let missing = json!({ "other": 1 });
        assert_eq!(field_text(&missing, "response"), r#"{"other":1}"#);
    }

    #[test]
    fn auth_failures_are_recognized_on_any_endpoint() {
        let rejected = ApiError::Server("Could not validate credentials".to_string());
        assert!(rejected.is_auth_failure());

        let unrelated = ApiError::Server("Expense not found".to_string());
        assert!(!unrelated.is_auth_failure());

        assert!(!ApiError::Connection.is_auth_failure());
    }

    #[test]
    fn connection_failures_render_the_fixed_message() {
        assert_eq!(
            ApiError::Connection.to_string(),
            "Could not connect to the server. Please ensure the backend is running."
        );
    }
}

/// Liveness probe. Answers plain text, never JSON.
pub async fn ping() -> &'static str {
    "pong"
}

// Client-side storage for the session token
pub trait TokenStore: Send + Sync {
    fn load(&self) -> anyhow::Result<Option<String>>;

    fn save(&self, token: &str) -> anyhow::Result<()>;

    /// Removing an absent token is not an error.
    fn clear(&self) -> anyhow::Result<()>;
}

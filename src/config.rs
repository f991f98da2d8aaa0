/// Cloud placement read from `CLOUD_PROVIDER` / `CLOUD_REGION`, captured
/// once when a session starts so the enricher never touches process-global
/// state itself.
#[derive(Debug, Clone, Default)]
pub struct CloudEnv {
    provider: Option<String>,
    region: Option<String>,
}

impl CloudEnv {
    pub fn from_env() -> Self {
        Self {
            provider: std::env::var("CLOUD_PROVIDER").ok(),
            region: std::env::var("CLOUD_REGION").ok(),
        }
    }

    pub fn new(provider: Option<String>, region: Option<String>) -> Self {
        Self { provider, region }
    }

    /// Display value for the record; absent reads as the literal "None".
    pub fn provider_label(&self) -> String {
        self.provider.clone().unwrap_or_else(|| "None".into())
    }

    pub fn region_label(&self) -> String {
        self.region.clone().unwrap_or_else(|| "None".into())
    }

    /// "Yes" iff the raw provider variable was present and non-empty.
    /// Note this checks presence, not the defaulted label: an operator who
    /// sets `CLOUD_PROVIDER=None` literally still reads as on-cloud.
    pub fn on_cloud(&self) -> &'static str {
        match &self.provider {
            Some(value) if !value.is_empty() => "Yes",
            _ => "No",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_provider_reads_off_cloud() {
        let env = CloudEnv::new(None, None);
        assert_eq!(env.provider_label(), "None");
        assert_eq!(env.region_label(), "None");
        assert_eq!(env.on_cloud(), "No");
    }

    #[test]
    fn set_provider_reads_on_cloud() {
        let env = CloudEnv::new(Some("aws".into()), Some("eu-west-1".into()));
        assert_eq!(env.provider_label(), "aws");
        assert_eq!(env.region_label(), "eu-west-1");
        assert_eq!(env.on_cloud(), "Yes");
    }

    #[test]
    fn empty_provider_reads_off_cloud() {
        let env = CloudEnv::new(Some(String::new()), None);
        assert_eq!(env.on_cloud(), "No");
    }

    #[test]
    fn literal_none_still_counts_as_on_cloud() {
        // Presence wins over the display default; preserved on purpose.
        let env = CloudEnv::new(Some("None".into()), None);
        assert_eq!(env.provider_label(), "None");
        assert_eq!(env.on_cloud(), "Yes");
    }
}

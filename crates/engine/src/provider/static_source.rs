use serde_json::Value;
use tracing::debug;

use super::{FetchError, MdpSource};

/// Serves one person profile and one organization regardless of the requested uuid.
///
/// Includes are ignored; the payloads are returned exactly as supplied.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub person: Option<Value>,
    pub organization: Option<Value>,
}

impl StaticSource {
    pub fn new(person: Option<Value>, organization: Option<Value>) -> Self {
        Self { person, organization }
    }
}

impl MdpSource for StaticSource {
    fn fetch_person_profile(&self, person_uuid: &str, includes: &[String]) -> Result<Value, FetchError> {
        debug!(person_uuid, ?includes, "serving static person profile");
        self.person
            .clone()
            .ok_or_else(|| FetchError::not_found("person profile", person_uuid))
    }

    fn fetch_organization(&self, organization_uuid: &str, includes: &[String]) -> Result<Value, FetchError> {
        debug!(organization_uuid, ?includes, "serving static organization");
        self.organization
            .clone()
            .ok_or_else(|| FetchError::not_found("organization", organization_uuid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_payload_is_not_found() {
        let source = StaticSource::new(Some(json!({"data": {}})), None);
        assert!(source.fetch_person_profile("p-1", &[]).is_ok());
        let error = source.fetch_organization("o-1", &[]).expect_err("no organization");
        assert!(matches!(error, FetchError::NotFound { ref id, .. } if id == "o-1"));
    }
}

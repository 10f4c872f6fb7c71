use serde_json::Value;

use super::{FetchError, MdpSource};

pub struct NullSource;

impl MdpSource for NullSource {
    fn fetch_person_profile(&self, _person_uuid: &str, _includes: &[String]) -> Result<Value, FetchError> {
        Err(FetchError::Unavailable)
    }

    fn fetch_organization(&self, _organization_uuid: &str, _includes: &[String]) -> Result<Value, FetchError> {
        Err(FetchError::Unavailable)
    }
}

//! Form definitions as configured by the form designer.

use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{FieldId, FormId};

/// Which MDP record a payload describes.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceKind {
    PersonProfile,
    Organization,
    AdditionalInfo,
}

impl DataSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PersonProfile => "person_profile",
            Self::Organization => "organization",
            Self::AdditionalInfo => "additional_info",
        }
    }
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDataSourceKindError(String);

impl fmt::Display for ParseDataSourceKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown data source '{}': expected person_profile, organization, or additional_info",
            self.0
        )
    }
}

impl Error for ParseDataSourceKindError {}

impl FromStr for DataSourceKind {
    type Err = ParseDataSourceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "person_profile" | "person" | "profile" => Ok(Self::PersonProfile),
            "organization" | "org" => Ok(Self::Organization),
            "additional_info" => Ok(Self::AdditionalInfo),
            _ => Err(ParseDataSourceKindError(s.to_string())),
        }
    }
}

/// Resource collections an MDP record can carry.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Address,
    Email,
    Phone,
    WebAddress,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [Self::Address, Self::Email, Self::Phone, Self::WebAddress];

    /// Name of the collection holding this resource (`addresses`, `emails`, ...).
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Address => "addresses",
            Self::Email => "emails",
            Self::Phone => "phones",
            Self::WebAddress => "web_addresses",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Email => "email address",
            Self::Phone => "phone number",
            Self::WebAddress => "web address",
        }
    }

    /// Parses the identifiers widgets post in `requiredResources`.
    pub fn from_widget_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "address" | "addresses" => Some(Self::Address),
            "email" | "emails" => Some(Self::Email),
            "phone" | "phones" => Some(Self::Phone),
            "web_address" | "web_addresses" | "webaddress" | "webaddresses" => Some(Self::WebAddress),
            _ => None,
        }
    }
}

/// Completeness requirements configured on a profile widget field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetRequirements {
    /// Field paths that must resolve to a non-empty value in the widget payload.
    #[serde(default)]
    pub required_fields: Vec<String>,
    /// Resource kinds that need at least one entry. `None` defers to the widget.
    #[serde(default)]
    pub required_resources: Option<Vec<ResourceKind>>,
}

/// Field kinds understood by the form engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Standard,
    Hidden,
    Page,
    OrganizationProfile(WidgetRequirements),
    IndividualProfile(WidgetRequirements),
    AdditionalInfo,
    OrganizationSearch,
}

impl FieldKind {
    /// Profile widgets whose completeness is gated by page transitions.
    pub fn widget_requirements(&self) -> Option<&WidgetRequirements> {
        match self {
            Self::OrganizationProfile(requirements) | Self::IndividualProfile(requirements) => Some(requirements),
            _ => None,
        }
    }
}

/// Where a bound field takes its value from.
///
/// Written as a one-key map: `source: { mdp: person_profile }` or `source: { widget: 1 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindingSource {
    /// A record fetched from the MDP at render time.
    Mdp { mdp: DataSourceKind },
    /// The JSON posted by another (widget) field in the same submission.
    Widget { widget: FieldId },
}

/// Binds a field's value to a path inside a data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBinding {
    pub source: BindingSource,
    pub path: String,
    #[serde(default)]
    pub fallback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub id: FieldId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default = "default_page_number")]
    pub page_number: u32,
    #[serde(default)]
    pub binding: Option<FieldBinding>,
}

fn default_page_number() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    pub id: FormId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl FormDefinition {
    /// A form is multi-step when it contains at least one page break.
    pub fn is_multi_step(&self) -> bool {
        self.fields.iter().any(|field| matches!(field.kind, FieldKind::Page))
    }

    pub fn field(&self, field_id: FieldId) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.id == field_id)
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ids::Id;

/// Label given to contact methods created without one.
pub const DEFAULT_METHOD_LABEL: &str = "默认";

/// The kind of a contact method. The tabular codec and the stats query
/// know exactly these four kinds; new kinds are added as variants here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Phone,
    Email,
    Social,
    Address,
}

impl MethodKind {
    pub const ALL: [MethodKind; 4] = [
        MethodKind::Phone,
        MethodKind::Email,
        MethodKind::Social,
        MethodKind::Address,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MethodKind::Phone => "phone",
            MethodKind::Email => "email",
            MethodKind::Social => "social",
            MethodKind::Address => "address",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "phone" => Some(MethodKind::Phone),
            "email" => Some(MethodKind::Email),
            "social" => Some(MethodKind::Social),
            "address" => Some(MethodKind::Address),
            _ => None,
        }
    }
}

impl std::fmt::Display for MethodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One typed way to reach a contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMethod {
    pub id: Id<ContactMethod>,
    #[serde(rename = "type")]
    pub kind: MethodKind,
    pub value: String,
    pub label: String,
}

impl ContactMethod {
    pub fn new(kind: MethodKind, value: String, label: Option<String>) -> Self {
        Self {
            id: Id::generate(),
            kind,
            value,
            label: label.unwrap_or_else(|| DEFAULT_METHOD_LABEL.to_string()),
        }
    }
}

/// A person record together with its contact methods. Methods belong to
/// the contact and are removed with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: Id<Contact>,
    pub name: String,
    pub notes: Option<String>,
    pub is_favorite: bool,
    pub methods: Vec<ContactMethod>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Contact {
    /// Values of all methods of one kind, in the order they were attached.
    pub fn method_values(&self, kind: MethodKind) -> Vec<&str> {
        self.methods
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| m.value.as_str())
            .collect()
    }
}

/// Store-independent input for creating a contact, produced by callers
/// and by the tabular codec during import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub methods: Vec<MethodDraft>,
}

impl ContactDraft {
    pub fn new(name: String) -> Self {
        Self {
            name,
            notes: None,
            is_favorite: false,
            methods: Vec::new(),
        }
    }
}

/// Input for one contact method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDraft {
    #[serde(rename = "type")]
    pub kind: MethodKind,
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl MethodDraft {
    pub fn new(kind: MethodKind, value: String) -> Self {
        Self {
            kind,
            value,
            label: None,
        }
    }
}

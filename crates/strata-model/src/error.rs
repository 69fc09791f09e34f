use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("{what} not found: {name}")]
    NotFound { what: &'static str, name: String },
    #[error("declaration of {owner}.{name}{descriptor} is unavailable: member was synthesized")]
    ReflectionUnavailable {
        owner: String,
        name: String,
        descriptor: String,
    },
}

impl ModelError {
    pub(crate) fn not_found(what: &'static str, name: impl Into<String>) -> Self {
        ModelError::NotFound {
            what,
            name: name.into(),
        }
    }
}

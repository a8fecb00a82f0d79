use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A resolved address with both street lines present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    /// First street line
    #[schema(example = "221B Baker Street")]
    pub street1: String,
    /// Second street line
    #[schema(example = "Marylebone, London")]
    pub street2: String,
}

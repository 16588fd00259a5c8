use crate::utils::duration::CodiumDuration;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::DisplayFromStr;

#[serde_as]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde_as(as = "DisplayFromStr")]
    pub access_token_expiry: CodiumDuration,
}
